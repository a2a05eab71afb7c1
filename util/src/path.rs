use std::{collections::VecDeque, hash::Hash};

use crate::HashSet;

/// Generate a shortest paths map on a grid according to a neighbors function.
///
/// Nodes are produced in order of increasing distance from the nearest start
/// node, along with that distance.
pub fn dijkstra_map<'a, T, I>(
    mut neighbors: impl FnMut(&T) -> I + 'a,
    starts: impl IntoIterator<Item = T>,
) -> impl Iterator<Item = (T, usize)> + 'a
where
    T: Clone + Eq + Hash + 'a,
    I: IntoIterator<Item = T>,
{
    let mut edge: VecDeque<(T, usize)> =
        starts.into_iter().map(|s| (s, 0)).collect();
    let mut seen = HashSet::default();

    std::iter::from_fn(move || {
        // First-in, first-out, so the first pop of a node has the shortest
        // distance.
        while let Some((node, len)) = edge.pop_front() {
            if seen.insert(node.clone()) {
                for n in neighbors(&node) {
                    edge.push_back((n, len + 1));
                }
                return Some((node, len));
            }
        }
        None
    })
}

#[cfg(test)]
mod test {
    use glam::{ivec2, IVec2};

    use super::*;
    use crate::DIR_4;

    #[test]
    fn fill_distances() {
        let open = |p: &IVec2| p.x.abs() <= 2 && p.y.abs() <= 2;
        let fill: Vec<(IVec2, usize)> = dijkstra_map(
            |p: &IVec2| {
                let p = *p;
                DIR_4.into_iter().map(move |d| p + d).filter(open)
            },
            [IVec2::ZERO],
        )
        .collect();

        assert_eq!(fill.len(), 25);
        assert_eq!(fill[0], (IVec2::ZERO, 0));
        assert!(fill.contains(&(ivec2(2, 2), 4)));
        assert!(fill.windows(2).all(|w| w[0].1 <= w[1].1));

        let near = fill.iter().take_while(|(_, k)| *k < 2).count();
        assert_eq!(near, 5);
    }
}
