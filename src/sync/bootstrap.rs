//! Session-start merge of remote state into empty local stores.
//!
//! Runs once, before any listener attaches. Local data always wins: a
//! store with existing local state is skipped without a single remote
//! read. Fetch failures and malformed payloads are logged and leave that
//! store empty; the merge as a whole always resolves.

use std::sync::Arc;

use serde_json::Value;

use crate::remote::paths::{self, DocTarget};
use crate::remote::{RemoteDocs, RemoteError};
use crate::store::StoreHandle;

/// Merges remote documents into every empty local store.
///
/// Per-store fetches are independent and read-only, so they run
/// concurrently; the future completes only when every store has either
/// merged, been skipped, or failed.
pub async fn merge_remote_into_local_if_empty(
    stores: &[Arc<dyn StoreHandle>],
    remote: &dyn RemoteDocs,
    user_id: &str,
) {
    let merges = stores
        .iter()
        .map(|handle| merge_one(handle.clone(), remote, user_id));
    futures::future::join_all(merges).await;
}

async fn merge_one(handle: Arc<dyn StoreHandle>, remote: &dyn RemoteDocs, user_id: &str) {
    if !handle.is_empty() {
        tracing::debug!("Skipping {} store merge, local data present", handle.id());
        return;
    }

    let fetched = fetch(&handle, remote, user_id).await;

    let value = match fetched {
        Err(e) => {
            tracing::warn!("Bootstrap fetch failed for {} store: {}", handle.id(), e);
            return;
        }
        Ok(None) => {
            tracing::debug!("No remote data for {} store", handle.id());
            return;
        }
        Ok(Some(value)) => value,
    };

    if value_is_empty(&value) {
        return;
    }
    if !handle.accepts_remote(&value) {
        tracing::warn!("Ignoring invalid remote data for {} store", handle.id());
        return;
    }

    match handle.replace_value(value) {
        Ok(()) => tracing::info!("Restored {} store from remote", handle.id()),
        // accepts_remote already deserialized once, so this only trips if
        // the two parses disagree.
        Err(e) => tracing::warn!("Failed to apply remote {} store: {}", handle.id(), e),
    }
}

async fn fetch(
    handle: &Arc<dyn StoreHandle>,
    remote: &dyn RemoteDocs,
    user_id: &str,
) -> Result<Option<Value>, RemoteError> {
    match paths::target(handle.id(), user_id) {
        DocTarget::Doc(path) => remote.read_document(&path).await,
        DocTarget::Collection(prefix) => {
            let docs = remote.read_collection(&prefix).await?;
            if docs.is_empty() {
                Ok(None)
            } else {
                Ok(Some(Value::Object(docs.into_iter().collect())))
            }
        }
    }
}

fn value_is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
