/// Creates a [`HashMap`](crate::HashMap) with the default hasher from a list
/// of `key => value` pairs.
///
/// Pairs are inserted in order, so a key that appears twice keeps its first
/// value.
///
/// # Examples
///
/// ```rust
/// use dense_hash::hash_map;
///
/// let map = hash_map! {
///     "a" => 1,
///     "b" => 2,
///     "a" => 3,
/// };
///
/// assert_eq!(map.len(), 2);
/// assert_eq!(map["a"], 1);
/// assert_eq!(map["b"], 2);
/// ```
#[macro_export]
macro_rules! hash_map {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut map = $crate::HashMap::<_, _, $crate::DefaultHashBuilder>::with_capacity(
            <[&str]>::len(&[$(stringify!($key)),*]),
        );
        $(map.insert($key, $value);)*
        map
    }};
}
