use hashbrown::HashSet;

/// Smallest positive id not present in `used`
///
/// Ids may arrive out of order or with gaps (imports), so this always scans
/// instead of keeping a counter.
pub fn lowest_unused_id<I>(used: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    let used: HashSet<u32> = used.into_iter().collect();
    let mut id = 1;
    while used.contains(&id) {
        id += 1;
    }
    id
}
