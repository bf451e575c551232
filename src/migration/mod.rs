pub mod driver;
pub mod enumerator;
pub mod keys;
pub mod nodes;
pub mod progress;
pub mod resolver;
pub mod sink;
pub mod translator;
pub mod workspace;

pub use driver::{DriverState, MigrationDriver, RunSummary, Workflow};
pub use keys::NodeId;
pub use nodes::NodeWorkflow;
pub use progress::{LogProgress, Observers, Progress, ProgressObserver};
pub use resolver::{EntityResolver, ResolverStats};
pub use sink::IdempotentSink;
pub use workspace::WorkspaceWorkflow;
