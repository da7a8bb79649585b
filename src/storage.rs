use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

/// On-disk mirror of the client-held state slices. Three logical keys,
/// each one JSON document: read once at startup, rewritten in full on
/// every change to the corresponding in-memory value.
#[derive(Clone)]
pub struct LocalStore {
    dir: Arc<PathBuf>,
}

#[derive(Debug, Clone, Copy)]
pub enum StoreKey {
    Favorites,
    Cart,
    Session,
}

impl StoreKey {
    fn file_name(self) -> &'static str {
        match self {
            StoreKey::Favorites => "favorites.json",
            StoreKey::Cart => "cart.json",
            StoreKey::Session => "session.json",
        }
    }
}

impl LocalStore {
    pub fn open(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating data dir {}", dir.display()))?;
        Ok(Self { dir: Arc::new(dir) })
    }

    fn path(&self, key: StoreKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// A missing file means the key was never written, not an error.
    pub fn load<T>(&self, key: StoreKey) -> anyhow::Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path(key);
        match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("decoding {}", path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
        }
    }

    /// Full rewrite through a temp file + rename so a crash mid-write
    /// never leaves a torn document behind.
    pub fn persist<T: Serialize>(&self, key: StoreKey, value: &T) -> anyhow::Result<()> {
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(value)?;
        fs::write(&tmp, &bytes).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use uuid::Uuid;

    #[test]
    fn missing_key_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        let favorites: HashMap<Uuid, Vec<Uuid>> = store.load(StoreKey::Favorites).unwrap();
        assert!(favorites.is_empty());
    }

    #[test]
    fn persist_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();

        let mut cart: HashMap<Uuid, Vec<String>> = HashMap::new();
        cart.insert(Uuid::new_v4(), vec!["lamp".to_string()]);
        store.persist(StoreKey::Cart, &cart).unwrap();

        let loaded: HashMap<Uuid, Vec<String>> = store.load(StoreKey::Cart).unwrap();
        assert_eq!(loaded, cart);
    }

    #[test]
    fn rewrite_replaces_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();

        store
            .persist(StoreKey::Session, &vec!["a".to_string(), "b".to_string()])
            .unwrap();
        store.persist(StoreKey::Session, &Vec::<String>::new()).unwrap();

        let loaded: Vec<String> = store.load(StoreKey::Session).unwrap();
        assert!(loaded.is_empty());
    }
}
