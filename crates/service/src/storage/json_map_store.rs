use std::{collections::HashMap, hash::Hash, path::PathBuf, sync::Arc};

use tokio::{fs, sync::RwLock};

use crate::errors::ServiceError;

/// Generic JSON file-backed key-value map store.
///
/// Persists a `HashMap<K, V>` to a JSON file and offers the handful of
/// read/mutate helpers the repositories need. Intended for lightweight state
/// where a database is overkill; every mutation rewrites the whole file.
#[derive(Clone)]
pub struct JsonMapStore<K, V> {
    inner: Arc<RwLock<HashMap<K, V>>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Initialize the store from a path. Creates the file with an empty map
    /// if missing; an unreadable or corrupt file degrades to an empty map.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => {
                let empty: HashMap<K, V> = HashMap::new();
                fs::write(&file_path, serde_json::to_vec(&empty).map_err(ServiceError::storage)?)
                    .await
                    .map_err(ServiceError::storage)?;
                empty
            }
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(map)), file_path }))
    }

    async fn save(&self) -> Result<(), ServiceError> {
        let map = self.inner.read().await;
        let data = serde_json::to_vec_pretty(&*map).map_err(ServiceError::storage)?;
        fs::write(&self.file_path, data).await.map_err(ServiceError::storage)?;
        Ok(())
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// First value matching the predicate, in unspecified order.
    pub async fn find<P>(&self, pred: P) -> Option<V>
    where
        P: Fn(&V) -> bool,
    {
        let map = self.inner.read().await;
        map.values().find(|v| pred(v)).cloned()
    }

    /// Insert a value under a key that must not exist yet; returns whether
    /// the insert happened. Persists on success.
    pub async fn insert_new(&self, key: K, value: V) -> Result<bool, ServiceError> {
        {
            let mut map = self.inner.write().await;
            if map.contains_key(&key) {
                return Ok(false);
            }
            map.insert(key, value);
        }
        self.save().await?;
        Ok(true)
    }

    /// Mutate the value stored under the first key whose value matches the
    /// predicate; returns the updated value. Persists only when a match was
    /// found.
    pub async fn update_where<P, F>(&self, pred: P, f: F) -> Result<Option<V>, ServiceError>
    where
        P: Fn(&V) -> bool,
        F: FnOnce(&mut V),
    {
        let updated = {
            let mut map = self.inner.write().await;
            match map.values_mut().find(|v| pred(v)) {
                Some(value) => {
                    f(value);
                    Some(value.clone())
                }
                None => None,
            }
        };
        if updated.is_some() {
            self.save().await?;
        }
        Ok(updated)
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
