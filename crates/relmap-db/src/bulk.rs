//! Bulk-insert id assignment.
//!
//! After a multi-row insert the adapter reports either the last assigned
//! auto-increment id (MySQL-style) or the full list of inserted keys
//! (RETURNING-style). Either way, every instance that went into the batch
//! gets its primary key back and is marked saved.

use relmap_core::{RelmapError, RelmapResult};

use crate::model::Instance;
use crate::registry::ModelRegistry;
use crate::value::Value;

/// Distributes a contiguous auto-increment id range over a batch.
///
/// A batch of `n` rows whose last assigned id is `last_insert_id` occupied
/// the range `[last_insert_id - n + 1, last_insert_id]`; the ids are handed
/// out in slice order. Each instance is then marked saved, capturing its
/// snapshot. An empty batch is a no-op.
pub fn assign_contiguous_ids(
    registry: &ModelRegistry,
    instances: &mut [Instance],
    last_insert_id: i64,
) -> RelmapResult<()> {
    let n = i64::try_from(instances.len())
        .map_err(|_| RelmapError::Database("batch too large for id assignment".to_string()))?;
    if n == 0 {
        return Ok(());
    }
    let first = last_insert_id - n + 1;
    for (offset, instance) in instances.iter_mut().enumerate() {
        // offset < n <= i64::MAX, so the cast is lossless.
        #[allow(clippy::cast_possible_wrap)]
        let id = first + offset as i64;
        instance.set_primary_key(registry, id)?;
        instance.set_saved(registry, true)?;
    }
    tracing::debug!(
        count = instances.len(),
        first,
        last = last_insert_id,
        "assigned contiguous ids"
    );
    Ok(())
}

/// Assigns adapter-returned keys to a batch, in order.
///
/// For adapters that report every inserted key (`RETURNING id`). The key
/// list must match the batch one-to-one; a length mismatch means the insert
/// and the batch have drifted apart and nothing is assigned.
pub fn assign_returned_ids(
    registry: &ModelRegistry,
    instances: &mut [Instance],
    ids: &[Value],
) -> RelmapResult<()> {
    if instances.len() != ids.len() {
        return Err(RelmapError::Database(format!(
            "insert returned {} ids for a batch of {} instances",
            ids.len(),
            instances.len()
        )));
    }
    for (instance, id) in instances.iter_mut().zip(ids) {
        instance.set_primary_key(registry, id.clone())?;
        instance.set_saved(registry, true)?;
    }
    Ok(())
}
