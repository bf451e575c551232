use crate::storage::traits::{DocumentCollection, Page};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, Select};
use aws_sdk_dynamodb::Client;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

/// DynamoDB Tabelle als Dokument-Collection
///
/// Jede Tabelle hat genau einen String Hash-Key (`key_attr`).
#[derive(Clone)]
pub struct DynamoDBCollection {
    client: Client,
    table_name: String,
    key_attr: String,
}

impl DynamoDBCollection {
    pub fn new(client: Client, table_name: impl Into<String>, key_attr: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            key_attr: key_attr.into(),
        }
    }

    fn key(&self, key: &str) -> HashMap<String, AttributeValue> {
        HashMap::from([(self.key_attr.clone(), AttributeValue::S(key.to_string()))])
    }

    // Helper: Fortsetzungs-Token ist der Hash-Key des letzten Items
    fn continuation(
        &self,
        last: Option<HashMap<String, AttributeValue>>,
    ) -> Result<Option<String>> {
        match last {
            None => Ok(None),
            Some(item) => item
                .get(&self.key_attr)
                .and_then(|v| v.as_s().ok())
                .cloned()
                .map(Some)
                .ok_or_else(|| {
                    anyhow!("Missing or invalid key field in last evaluated key: {}", self.key_attr)
                }),
        }
    }
}

#[async_trait]
impl DocumentCollection for DynamoDBCollection {
    async fn find_one(&self, key: &str) -> Result<Option<Value>> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(self.key(key)))
            .consistent_read(true)
            .send()
            .await?;

        response.item.map(item_to_document).transpose()
    }

    async fn scan_page(&self, start: Option<String>) -> Result<Page<Value>> {
        let response = self
            .client
            .scan()
            .table_name(&self.table_name)
            .set_exclusive_start_key(start.map(|k| self.key(&k)))
            .send()
            .await?;

        let mut items = Vec::new();
        if let Some(raw) = response.items {
            for item in raw {
                items.push(item_to_document(item)?);
            }
        }

        Ok(Page {
            items,
            next: self.continuation(response.last_evaluated_key)?,
        })
    }

    async fn count(&self) -> Result<u64> {
        let mut total = 0u64;
        let mut start = None;
        loop {
            let response = self
                .client
                .scan()
                .table_name(&self.table_name)
                .select(Select::Count)
                .set_exclusive_start_key(start)
                .send()
                .await?;

            total += u64::try_from(response.count).unwrap_or(0);
            start = response.last_evaluated_key;
            if start.is_none() {
                return Ok(total);
            }
        }
    }

    async fn replace_one(&self, key: &str, doc: Value) -> Result<()> {
        let Value::Object(fields) = doc else {
            bail!("Document for {} in {} is not an object", key, self.table_name);
        };

        let mut item = HashMap::new();
        for (name, value) in fields {
            item.insert(name, json_to_attribute(value));
        }
        item.insert(self.key_attr.clone(), AttributeValue::S(key.to_string()));

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await?;

        Ok(())
    }

    async fn set_fields(&self, key: &str, fields: Map<String, Value>) -> Result<()> {
        if fields.is_empty() {
            bail!("No fields to set for {} in {}", key, self.table_name);
        }

        let mut assignments = Vec::with_capacity(fields.len());
        let mut names = HashMap::new();
        let mut values = HashMap::new();
        for (i, (name, value)) in fields.into_iter().enumerate() {
            assignments.push(format!("#f{i} = :v{i}"));
            names.insert(format!("#f{i}"), name);
            values.insert(format!(":v{i}"), json_to_attribute(value));
        }

        // UpdateItem legt fehlende Items an und lässt andere Felder unangetastet
        self.client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(self.key(key)))
            .update_expression(format!("SET {}", assignments.join(", ")))
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .send()
            .await?;

        Ok(())
    }
}

/// Konvertiere ein DynamoDB Item zu einem JSON Dokument
pub fn item_to_document(item: HashMap<String, AttributeValue>) -> Result<Value> {
    let mut doc = Map::new();
    for (name, value) in item {
        let converted = attribute_to_json(value).map_err(|e| anyhow!("field {}: {}", name, e))?;
        doc.insert(name, converted);
    }
    Ok(Value::Object(doc))
}

pub fn attribute_to_json(value: AttributeValue) -> Result<Value> {
    Ok(match value {
        AttributeValue::S(s) => Value::String(s),
        AttributeValue::N(n) => Value::Number(parse_number(&n)?),
        AttributeValue::Bool(b) => Value::Bool(b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(list) => Value::Array(
            list.into_iter()
                .map(attribute_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        AttributeValue::M(map) => item_to_document(map)?,
        AttributeValue::Ss(set) => Value::Array(set.into_iter().map(Value::String).collect()),
        AttributeValue::Ns(set) => Value::Array(
            set.iter()
                .map(|n| parse_number(n).map(Value::Number))
                .collect::<Result<Vec<_>>>()?,
        ),
        other => bail!("unsupported attribute type: {:?}", other),
    })
}

pub fn json_to_attribute(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(list) => AttributeValue::L(list.into_iter().map(json_to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(
            map.into_iter()
                .map(|(k, v)| (k, json_to_attribute(v)))
                .collect(),
        ),
    }
}

fn parse_number(n: &str) -> Result<Number> {
    if let Ok(i) = n.parse::<i64>() {
        return Ok(i.into());
    }
    if let Ok(u) = n.parse::<u64>() {
        return Ok(u.into());
    }
    n.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| anyhow!("Missing or invalid number: {}", n))
}
