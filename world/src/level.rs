//! Level terrain grids and the interface to map generators.

use anyhow::bail;
use glam::{ivec2, IVec2};
use rand::RngCore;
use util::{dijkstra_map, HashSet, StrExt, DIR_4};

use crate::MapTile;

/// Rectangular room area, `max` is exclusive.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Room {
    pub min: IVec2,
    pub max: IVec2,
}

impl Room {
    pub fn new(min: impl Into<IVec2>, max: impl Into<IVec2>) -> Self {
        Room {
            min: min.into(),
            max: max.into(),
        }
    }

    pub fn center(&self) -> IVec2 {
        (self.min + self.max - IVec2::ONE).div_euclid(ivec2(2, 2))
    }

    pub fn contains(&self, p: IVec2) -> bool {
        p.cmpge(self.min).all() && p.cmplt(self.max).all()
    }

    pub fn size(&self) -> IVec2 {
        self.max - self.min
    }

    pub fn cells(&self) -> impl Iterator<Item = IVec2> {
        let Room { min, max } = *self;
        (min.y..max.y)
            .flat_map(move |y| (min.x..max.x).map(move |x| ivec2(x, y)))
    }
}

/// Terrain of a single dungeon level and its room layout.
///
/// Produced by a map generator once per level and consumed when populating
/// the runtime world.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Level {
    size: IVec2,
    tiles: Vec<MapTile>,
    rooms: Vec<Room>,
    entrance: Option<IVec2>,
}

impl Level {
    /// Create a level of solid wall.
    pub fn new(width: i32, height: i32) -> Self {
        let size = ivec2(width.max(0), height.max(0));
        Level {
            size,
            tiles: vec![MapTile::Wall; (size.x * size.y) as usize],
            rooms: Vec::new(),
            entrance: None,
        }
    }

    pub fn width(&self) -> i32 {
        self.size.x
    }

    pub fn height(&self) -> i32 {
        self.size.y
    }

    pub fn in_bounds(&self, p: IVec2) -> bool {
        p.cmpge(IVec2::ZERO).all() && p.cmplt(self.size).all()
    }

    fn idx(&self, p: IVec2) -> Option<usize> {
        self.in_bounds(p).then(|| (p.x + p.y * self.size.x) as usize)
    }

    /// Tile at position, positions outside the level are wall.
    pub fn get(&self, p: IVec2) -> MapTile {
        self.idx(p).map_or(MapTile::Wall, |i| self.tiles[i])
    }

    pub fn set(&mut self, p: IVec2, t: MapTile) {
        if let Some(i) = self.idx(p) {
            self.tiles[i] = t;
        } else {
            log::warn!("Level::set: {p} is out of bounds");
        }
    }

    pub fn is_walkable(&self, p: IVec2) -> bool {
        self.get(p).is_walkable()
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Carve a room into the terrain and register it.
    pub fn add_room(&mut self, room: Room) {
        for p in room.cells() {
            self.set(p, MapTile::Floor);
        }
        self.rooms.push(room);
    }

    /// Explicit player start point, if the generator chose one.
    pub fn entrance(&self) -> Option<IVec2> {
        self.entrance
    }

    pub fn set_entrance(&mut self, p: IVec2) {
        self.entrance = Some(p);
    }

    /// Iterate all cells and their tiles in scanline order.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, MapTile)> + '_ {
        self.tiles.iter().enumerate().map(|(i, &t)| {
            let i = i as i32;
            (ivec2(i % self.size.x, i / self.size.x), t)
        })
    }

    /// Recompute room list from connected areas of room floor.
    ///
    /// Rooms are ordered by their topmost-leftmost cell.
    fn detect_rooms(&mut self) {
        let mut seen = HashSet::default();
        let mut rooms = Vec::new();

        for (p, t) in self.iter() {
            if !t.is_room_floor() || seen.contains(&p) {
                continue;
            }

            let area: Vec<IVec2> = dijkstra_map(
                |&q: &IVec2| {
                    DIR_4
                        .into_iter()
                        .map(move |d| q + d)
                        .filter(|&n| self.get(n).is_room_floor())
                        .collect::<Vec<_>>()
                },
                [p],
            )
            .map(|(q, _)| q)
            .collect();

            let (mut min, mut max) = (p, p);
            for &q in &area {
                min = min.min(q);
                max = max.max(q);
                seen.insert(q);
            }
            rooms.push(Room::new(min, max + IVec2::ONE));
        }

        self.rooms = rooms;
    }
}

/// Source of level terrain.
///
/// Procedural dungeon carving lives outside the engine, anything that can
/// produce a `Level` can drive it.
pub trait MapGenerator {
    fn generate(&mut self, rng: &mut dyn RngCore) -> anyhow::Result<Level>;
}

/// Hand-drawn level from an ASCII map.
///
/// Terrain glyphs follow `MapTile`'s character mapping, `@` marks the
/// entrance on a floor cell. Rooms are the connected areas of `.` floor,
/// draw connecting passages with `,` corridor cells so they don't merge
/// into the rooms.
#[derive(Clone, Debug)]
pub struct Prefab(pub String);

impl Prefab {
    pub fn new(map: impl Into<String>) -> Self {
        Prefab(map.into())
    }

    pub fn parse(&self) -> anyhow::Result<Level> {
        let cells: Vec<(IVec2, char)> = self.0.char_grid().collect();
        if cells.is_empty() {
            bail!("Prefab: empty map");
        }

        let size = cells
            .iter()
            .fold(IVec2::ZERO, |acc, (p, _)| acc.max(*p + IVec2::ONE));
        let mut level = Level::new(size.x, size.y);

        for (p, c) in cells {
            if c == '@' {
                level.set(p, MapTile::Floor);
                level.set_entrance(p);
                continue;
            }

            match MapTile::try_from(c) {
                Ok(t) => level.set(p, t),
                Err(e) => bail!("Prefab: {e} {c:?} at {p}"),
            }
        }

        level.detect_rooms();
        Ok(level)
    }
}

impl MapGenerator for Prefab {
    fn generate(&mut self, _rng: &mut dyn RngCore) -> anyhow::Result<Level> {
        self.parse()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    const MAP: &str = "
        ##########
        #...#....#
        #.@.,....#
        #...#....#
        ######~###";

    #[test]
    fn parse_prefab() {
        let level = Prefab::new(MAP).parse().unwrap();
        assert_eq!(level.width(), 10);
        assert_eq!(level.height(), 5);
        assert_eq!(level.entrance(), Some(ivec2(2, 2)));
        assert_eq!(level.get(ivec2(4, 2)), MapTile::Corridor);
        assert_eq!(level.get(ivec2(6, 4)), MapTile::Water);
        assert_eq!(level.get(ivec2(-1, 0)), MapTile::Wall);
        assert_eq!(level.get(ivec2(100, 100)), MapTile::Wall);

        assert_eq!(
            level.rooms(),
            &[
                Room::new(ivec2(1, 1), ivec2(4, 4)),
                Room::new(ivec2(5, 1), ivec2(9, 4)),
            ]
        );
        assert_eq!(level.rooms()[0].center(), ivec2(2, 2));
    }

    #[test]
    fn bad_prefab() {
        assert!(Prefab::new("").parse().is_err());
        assert!(Prefab::new("#?#").parse().is_err());
    }

    #[test]
    fn carve_rooms() {
        let mut level = Level::new(8, 8);
        let room = Room::new(ivec2(2, 2), ivec2(5, 4));
        level.add_room(room);

        assert_eq!(room.cells().count(), 6);
        assert!(room.contains(ivec2(4, 3)));
        assert!(!room.contains(ivec2(5, 3)));
        assert!(level.is_walkable(ivec2(2, 2)));
        assert!(!level.is_walkable(ivec2(1, 2)));
        assert_eq!(level.rooms().len(), 1);
    }
}
