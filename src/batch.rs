//! Fixed-size parallel fetch with all-or-nothing semantics

use futures::future::try_join_all;
use tracing::{debug, warn};

use crate::character::RawCharacter;
use crate::error::GalleryResult;
use crate::source::CharacterSource;

/// Fetch `n` records concurrently. Succeeds only if every call succeeds;
/// the first failure discards the whole batch.
pub async fn load_batch<S>(source: &S, n: usize) -> GalleryResult<Vec<RawCharacter>>
where
    S: CharacterSource + ?Sized,
{
    debug!(n, "fetching batch");
    let requests = (0..n).map(|_| source.fetch_random());

    match try_join_all(requests).await {
        Ok(records) => Ok(records),
        Err(e) => {
            warn!(error = %e, n, "batch load failed");
            Err(e)
        }
    }
}
