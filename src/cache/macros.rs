/// A macro to simplify read-through caching.
///
/// Returns the cached value when present. Otherwise awaits the provided
/// future, stores its value in the cache, and returns it. Errors from the
/// future are propagated with `?` and are never cached.
///
/// # Arguments
/// * `$cache`: The [`Cache`](crate::cache::Cache) to read from and write to.
/// * `$key`: The [`CacheKey`](crate::cache::CacheKey) for the value.
/// * `$block`: A future producing `AppResult<T>` on a cache miss.
///
/// # Example
/// ```rust,ignore
/// let metadata: AppResult<MovieMetadata> = cached!(
///     self.cache,
///     CacheKey::Metadata(movie_id),
///     async move { self.fetch_uncached(movie_id).await }
/// );
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get_from_cache(&key).await {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set(key, ::std::clone::Clone::clone(&value)).await;
            Ok(value)
        }
    }};
}
