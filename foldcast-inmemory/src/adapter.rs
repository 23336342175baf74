use std::{
    collections::{BTreeMap, HashMap},
    sync::RwLock,
};

use async_trait::async_trait;
use foldcast::projection::PersistenceAdapter;

/// An in memory persistence adapter for read models.
///
/// Records are JSON values keyed by collection name and record id.
/// Useful for testing; data does not persist to disk.
#[derive(Debug, Default)]
pub struct InMemoryAdapter {
    collections: RwLock<HashMap<String, BTreeMap<String, serde_json::Value>>>,
}

#[async_trait]
impl PersistenceAdapter for InMemoryAdapter {
    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<serde_json::Value>, foldcast::Error> {
        let collections = self
            .collections
            .read()
            .map_err(|_| foldcast::Error::RwPoison)?;

        Ok(collections
            .get(collection)
            .and_then(|records| records.get(id).cloned()))
    }

    async fn insert(
        &self,
        collection: &str,
        id: &str,
        record: serde_json::Value,
    ) -> Result<(), foldcast::Error> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| foldcast::Error::RwPoison)?;

        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), record);

        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        record: serde_json::Value,
    ) -> Result<(), foldcast::Error> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| foldcast::Error::RwPoison)?;

        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), record);

        Ok(())
    }
}

#[cfg(feature = "debug")]
impl InMemoryAdapter {
    /// Print a collection as a table to stdout.
    pub fn print(&self, collection: &str) {
        let collections = self.collections.read().unwrap();
        let records = collections.get(collection);

        let mut table = prettytable::Table::new();
        table.set_titles(["ID", "Record"].into());

        match records {
            Some(records) if !records.is_empty() => {
                for (id, record) in records.iter() {
                    table.add_row(
                        [id.clone(), serde_json::to_string(record).unwrap()].into(),
                    );
                }
            }
            _ => {
                table.add_row(["", ""].into());
            }
        }

        table.printstd();
    }
}

#[cfg(test)]
mod tests {
    use foldcast::projection::PersistenceAdapter;
    use serde_json::json;

    use super::InMemoryAdapter;

    #[tokio::test]
    async fn get_insert_update_round_trip() -> Result<(), foldcast::Error> {
        let adapter = InMemoryAdapter::default();

        assert!(adapter.get("customers", "customer-1").await?.is_none());

        adapter
            .insert("customers", "customer-1", json!({ "name": "Ada" }))
            .await?;
        assert_eq!(
            adapter.get("customers", "customer-1").await?,
            Some(json!({ "name": "Ada" }))
        );

        adapter
            .update("customers", "customer-1", json!({ "name": "Ada L." }))
            .await?;
        assert_eq!(
            adapter.get("customers", "customer-1").await?,
            Some(json!({ "name": "Ada L." }))
        );

        // Collections are independent.
        assert!(adapter.get("orders", "customer-1").await?.is_none());

        Ok(())
    }
}
