/// Multi-key operations composed from the single-key primitives
///
/// None of these are atomic. `empty` and `delete_multiple` fan their deletes
/// out concurrently; `get_all` and `set_all` run strictly one key at a time.
use crate::client::Client;
use crate::error::Result;
use futures::future::try_join_all;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

impl Client {
    /// Delete every key in the store
    ///
    /// Keys written after the listing is taken survive.
    pub async fn empty(&self) -> Result<&Self> {
        let keys = self.list_all().await?;
        debug!(count = keys.len(), "Deleting all listed keys");

        try_join_all(keys.iter().map(|key| self.delete(key))).await?;
        Ok(self)
    }

    /// Read every key and its decoded value
    ///
    /// Keys whose value is absent or `null` by the time they are read map to
    /// `Value::Null`. The first value that fails to decode aborts the read.
    pub async fn get_all(&self) -> Result<BTreeMap<String, Value>> {
        let keys = self.list_all().await?;
        debug!(count = keys.len(), "Reading all listed keys");

        let mut output = BTreeMap::new();
        for key in keys {
            let value = self.get(&key).await?.unwrap_or(Value::Null);
            output.insert(key, value);
        }
        Ok(output)
    }

    /// Write each entry in iteration order, one request at a time
    ///
    /// # Example
    /// ```no_run
    /// # use flatkv_client::Client;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::connect("http://localhost:8080")?;
    /// client.set_all([("key", "value"), ("second", "secondThing")]).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn set_all<I, K, V>(&self, entries: I) -> Result<&Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Serialize,
    {
        for (key, value) in entries {
            self.set(key.as_ref(), &value).await?;
        }
        Ok(self)
    }

    /// Delete several keys concurrently
    pub async fn delete_multiple<I, K>(&self, keys: I) -> Result<&Self>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let keys: Vec<K> = keys.into_iter().collect();
        debug!(count = keys.len(), "Deleting keys");

        try_join_all(keys.iter().map(|key| self.delete(key.as_ref()))).await?;
        Ok(self)
    }
}
