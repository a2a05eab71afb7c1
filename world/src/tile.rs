/// Specific terrain in a single level map cell.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Debug)]
pub enum MapTile {
    /// Out-of-bounds cells read as wall.
    #[default]
    Wall,
    /// Room floor.
    Floor,
    /// Connecting passage between rooms, walkable but not part of a room.
    Corridor,
    Door,
    Water,
    Downstairs,
}

use MapTile::*;

impl MapTile {
    pub fn blocks_movement(self) -> bool {
        matches!(self, Wall | Water)
    }

    pub fn is_walkable(self) -> bool {
        !self.blocks_movement()
    }

    /// Sight lines pass through exactly the cells you could walk through.
    pub fn blocks_sight(self) -> bool {
        self.blocks_movement()
    }

    /// Cells that count towards a room's area.
    pub fn is_room_floor(self) -> bool {
        matches!(self, Floor | Downstairs)
    }
}

impl TryFrom<char> for MapTile {
    type Error = &'static str;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '#' => Ok(Wall),
            '.' => Ok(Floor),
            ',' => Ok(Corridor),
            '+' => Ok(Door),
            '~' => Ok(Water),
            '>' => Ok(Downstairs),
            _ => Err("invalid terrain char"),
        }
    }
}

impl From<MapTile> for char {
    fn from(val: MapTile) -> Self {
        // NB. This must match the TryFrom inputs above.
        match val {
            Wall => '#',
            Floor => '.',
            Corridor => ',',
            Door => '+',
            Water => '~',
            Downstairs => '>',
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn char_roundtrip_and_passability() {
        for c in "#.,+~>".chars() {
            let t = MapTile::try_from(c).unwrap();
            assert_eq!(char::from(t), c);
        }
        assert!(MapTile::try_from('x').is_err());

        assert!(Wall.blocks_movement());
        assert!(Water.blocks_sight());
        assert!(Door.is_walkable());
        assert!(!Corridor.is_room_floor());
    }
}
