use std::collections::HashMap;

/// Split a table -> requests batch into batches of at most `chunk_size`
/// requests in total.
///
/// Requests are flattened in table iteration order, cut into consecutive
/// runs, and each run is grouped back by table. Requests of one table keep
/// their relative order across the chunks.
pub fn chunk_write_requests<R, I>(batch: I, chunk_size: usize) -> Vec<HashMap<String, Vec<R>>>
where
    I: IntoIterator<Item = (String, Vec<R>)>,
{
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut current: HashMap<String, Vec<R>> = HashMap::new();
    let mut current_len = 0;

    for (table_name, requests) in batch {
        for request in requests {
            if current_len == chunk_size {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            current.entry(table_name.clone()).or_default().push(request);
            current_len += 1;
        }
    }

    if current_len > 0 {
        chunks.push(current);
    }

    chunks
}
