use glam::{ivec2, IVec2};

pub trait StrExt {
    /// Return the smallest indentation of the non-empty lines of the string.
    fn indentation(&self) -> usize;

    /// Iterate the non-whitespace characters of a text block as a grid.
    ///
    /// Leading blank lines and the common indentation are skipped, so the
    /// topmost row is y = 0 and the leftmost column is x = 0.
    fn char_grid(&self) -> impl Iterator<Item = (IVec2, char)> + '_;

    /// Uppercase the first letter.
    fn capitalize(&self) -> String;
}

impl StrExt for str {
    fn indentation(&self) -> usize {
        self.lines()
            .filter(|a| !a.trim().is_empty())
            .map(|a| a.chars().take_while(|c| c.is_whitespace()).count())
            .min()
            .unwrap_or(0)
    }

    fn char_grid(&self) -> impl Iterator<Item = (IVec2, char)> + '_ {
        let x_skip = self.indentation();

        self.lines()
            .skip_while(|a| a.trim().is_empty())
            .enumerate()
            .flat_map(move |(y, line)| {
                line.chars()
                    .skip(x_skip)
                    .enumerate()
                    .filter(|(_, c)| !c.is_whitespace())
                    .map(move |(x, c)| (ivec2(x as i32, y as i32), c))
            })
    }

    fn capitalize(&self) -> String {
        let mut chars = self.chars();
        match chars.next() {
            Some(c) => c.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}
