//! 实体级互斥 - 同一实体上的变更串行执行
//!
//! A double-click on "accept" must not send two accepts. Mutations on
//! different entities still run concurrently.

use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Table(i64),
    Item(i64),
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Table(id) => write!(f, "table:{id}"),
            EntityKey::Item(id) => write!(f, "item:{id}"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityLocks {
    locks: Arc<DashMap<EntityKey, Arc<Mutex<()>>>>,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other mutation holds `key`
    pub async fn lock(&self, key: EntityKey) -> OwnedMutexGuard<()> {
        // shard guard must be released before awaiting
        let mutex = Arc::clone(self.locks.entry(key).or_default().value());
        mutex.lock_owned().await
    }

    pub fn is_locked(&self, key: EntityKey) -> bool {
        self.locks
            .get(&key)
            .is_some_and(|m| m.try_lock().is_err())
    }

    /// Drop entries nobody is holding or waiting on
    pub fn prune(&self) {
        self.locks.retain(|_, m| Arc::strong_count(m) > 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_serializes() {
        let locks = EntityLocks::new();
        let log = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let guard = locks.lock(EntityKey::Item(7)).await;
        assert!(locks.is_locked(EntityKey::Item(7)));

        let second = {
            let locks = locks.clone();
            let log = log.clone();
            tokio::spawn(async move {
                let _guard = locks.lock(EntityKey::Item(7)).await;
                log.lock().push("second");
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        log.lock().push("first");
        drop(guard);
        second.await.unwrap();

        assert_eq!(*log.lock(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = EntityLocks::new();
        let _table = locks.lock(EntityKey::Table(1)).await;
        let item = tokio::time::timeout(Duration::from_millis(50), locks.lock(EntityKey::Item(1))).await;
        assert!(item.is_ok());
    }

    #[tokio::test]
    async fn test_prune_keeps_held_locks() {
        let locks = EntityLocks::new();
        let held = locks.lock(EntityKey::Table(2)).await;
        drop(locks.lock(EntityKey::Table(3)).await);
        assert_eq!(locks.len(), 2);

        locks.prune();
        assert_eq!(locks.len(), 1);
        assert!(locks.is_locked(EntityKey::Table(2)));
        drop(held);
    }
}
