use std::collections::HashMap;
use std::hash::Hash;

/// Cuts a closed vertex cycle at every repeated vertex into loops without
/// repetitions.
///
/// The cycle is walked once while a path of pending vertices is kept. When
/// a vertex already on the path shows up again, the stretch since its first
/// occurrence is emitted as a loop and the path resumes from that vertex.
/// Loops are emitted innermost first; the remainder of the path is the last
/// loop. Loops with fewer than three vertices are returned too and are
/// left to the caller to discard.
pub(crate) fn split_at_repeated_vertices<T, K>(cycle: &[T], key: impl Fn(&T) -> K) -> Vec<Vec<T>>
where
    T: Copy,
    K: Eq + Hash,
{
    let mut loops = Vec::new();
    let mut path: Vec<T> = Vec::with_capacity(cycle.len());
    let mut position: HashMap<K, usize> = HashMap::with_capacity(cycle.len());

    for item in cycle {
        if let Some(&start) = position.get(&key(item)) {
            let tail: Vec<T> = path.drain(start + 1..).collect();
            for t in &tail {
                position.remove(&key(t));
            }
            let mut closed = Vec::with_capacity(tail.len() + 1);
            closed.push(path[start]);
            closed.extend(tail);
            loops.push(closed);
        } else {
            position.insert(key(item), path.len());
            path.push(*item);
        }
    }
    if !path.is_empty() {
        loops.push(path);
    }
    loops
}
