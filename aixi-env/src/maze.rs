//! A 2-D maze. The layout is a rectangular character grid: `@` walls, `*`
//! teleport-to squares, `!` teleport-from squares, `&` plain squares. Each
//! square carries a reward, normalized so the smallest is 0; the agent is
//! rewarded for the square it *attempted* to enter, whether or not a wall
//! stopped it. Three observation encodings are supported.

use aixi_core::{AgentRng, Environment};
use serde::Deserialize;

use crate::EnvError;

pub const C_WALL: char = '@';
pub const C_TELEPORT_TO: char = '*';
pub const C_TELEPORT_FROM: char = '!';
pub const C_EMPTY: char = '&';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObservationEncoding {
    /// The agent always observes 0.
    #[default]
    Uninformative,
    /// The agent observes which of its four neighbours are walls.
    Walls,
    /// The agent observes its own coordinates.
    Coordinates,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MazeConfig {
    /// One string per row; all rows must be the same width.
    pub layout: Vec<String>,
    /// One reward per square, row by row.
    pub rewards: Vec<Vec<i32>>,
    #[serde(default)]
    pub observation_encoding: ObservationEncoding,
}

pub struct Maze {
    layout: Vec<Vec<char>>,
    rewards: Vec<Vec<u32>>,
    rows: usize,
    cols: usize,
    encoding: ObservationEncoding,
    max_reward: u32,
    row: usize,
    col: usize,
    teleported: bool,
    wall_collision: bool,
    observation: u32,
    reward: u32,
}

impl Maze {
    pub const A_LEFT: u32 = 0;
    pub const A_UP: u32 = 1;
    pub const A_RIGHT: u32 = 2;
    pub const A_DOWN: u32 = 3;

    pub const O_LEFT_WALL: u32 = 1;
    pub const O_UP_WALL: u32 = 2;
    pub const O_RIGHT_WALL: u32 = 4;
    pub const O_DOWN_WALL: u32 = 8;

    pub fn new(config: &MazeConfig, rng: &mut AgentRng) -> Result<Self, EnvError> {
        let rows = config.layout.len();
        if rows == 0 {
            return Err(EnvError::InvalidOption {
                msg: "maze layout must have at least one row".into(),
            });
        }
        let layout: Vec<Vec<char>> = config.layout.iter().map(|r| r.chars().collect()).collect();
        let cols = layout[0].len();
        if cols == 0 || layout.iter().any(|r| r.len() != cols) {
            return Err(EnvError::InvalidOption {
                msg: "maze layout rows must be non-empty and equal width".into(),
            });
        }
        for row in &layout {
            for &c in row {
                if ![C_WALL, C_TELEPORT_TO, C_TELEPORT_FROM, C_EMPTY].contains(&c) {
                    return Err(EnvError::InvalidOption {
                        msg: format!("unknown maze square '{c}'"),
                    });
                }
            }
        }
        if config.rewards.len() != rows || config.rewards.iter().any(|r| r.len() != cols) {
            return Err(EnvError::InvalidOption {
                msg: "maze rewards must match the layout dimensions".into(),
            });
        }
        if !layout.iter().flatten().any(|&c| c == C_TELEPORT_TO) {
            return Err(EnvError::InvalidOption {
                msg: "maze needs at least one teleport-to square".into(),
            });
        }

        // Shift rewards so the smallest is zero.
        let min_reward = *config.rewards.iter().flatten().min().expect("non-empty");
        let max_reward = *config.rewards.iter().flatten().max().expect("non-empty");
        let rewards: Vec<Vec<u32>> = config
            .rewards
            .iter()
            .map(|r| r.iter().map(|&v| (v - min_reward) as u32).collect())
            .collect();

        let mut maze = Self {
            layout,
            rewards,
            rows,
            cols,
            encoding: config.observation_encoding,
            max_reward: (max_reward - min_reward) as u32,
            row: 0,
            col: 0,
            teleported: false,
            wall_collision: false,
            observation: 0,
            reward: 0,
        };
        maze.teleport(rng);
        maze.compute_observation();
        Ok(maze)
    }

    fn teleport(&mut self, rng: &mut AgentRng) {
        self.teleported = true;
        loop {
            self.row = rng.rand_range(self.rows as u32) as usize;
            self.col = rng.rand_range(self.cols as u32) as usize;
            if self.layout[self.row][self.col] == C_TELEPORT_TO {
                break;
            }
        }
    }

    fn is_wall(&self, row: isize, col: isize) -> bool {
        row < 0
            || col < 0
            || row >= self.rows as isize
            || col >= self.cols as isize
            || self.layout[row as usize][col as usize] == C_WALL
    }

    fn compute_observation(&mut self) {
        self.observation = match self.encoding {
            ObservationEncoding::Uninformative => 0,
            ObservationEncoding::Walls => {
                let row = self.row as isize;
                let col = self.col as isize;
                let mut observation = 0;
                if self.is_wall(row, col - 1) {
                    observation += Self::O_LEFT_WALL;
                }
                if self.is_wall(row - 1, col) {
                    observation += Self::O_UP_WALL;
                }
                if self.is_wall(row, col + 1) {
                    observation += Self::O_RIGHT_WALL;
                }
                if self.is_wall(row + 1, col) {
                    observation += Self::O_DOWN_WALL;
                }
                observation
            }
            ObservationEncoding::Coordinates => (self.row * self.cols + self.col) as u32,
        };
    }
}

impl Environment for Maze {
    fn max_action(&self) -> u32 {
        3
    }

    fn max_observation(&self) -> u32 {
        match self.encoding {
            ObservationEncoding::Uninformative => 0,
            ObservationEncoding::Walls => {
                Self::O_LEFT_WALL + Self::O_UP_WALL + Self::O_RIGHT_WALL + Self::O_DOWN_WALL
            }
            ObservationEncoding::Coordinates => (self.rows * self.cols - 1) as u32,
        }
    }

    fn max_reward(&self) -> u32 {
        self.max_reward
    }

    fn observation(&self) -> u32 {
        self.observation
    }

    fn reward(&self) -> u32 {
        self.reward
    }

    fn perform_action(&mut self, action: u32, rng: &mut AgentRng) {
        assert!(self.is_valid_action(action));
        self.teleported = false;
        self.wall_collision = false;

        // Clamp the attempted move to the grid.
        let row_delta: isize = match action {
            Self::A_UP => -1,
            Self::A_DOWN => 1,
            _ => 0,
        };
        let col_delta: isize = match action {
            Self::A_LEFT => -1,
            Self::A_RIGHT => 1,
            _ => 0,
        };
        let row_to = (self.row as isize + row_delta).clamp(0, self.rows as isize - 1) as usize;
        let col_to = (self.col as isize + col_delta).clamp(0, self.cols as isize - 1) as usize;

        self.wall_collision = self.layout[row_to][col_to] == C_WALL;
        if !self.wall_collision {
            self.row = row_to;
            self.col = col_to;
        }

        if self.layout[self.row][self.col] == C_TELEPORT_FROM {
            self.teleport(rng);
        }

        // Reward is for the square the agent attempted to enter, even when
        // a wall kept it out.
        self.reward = self.rewards[row_to][col_to];
        self.compute_observation();
    }

    fn describe(&self) -> String {
        let mut out = format!(
            "row = {}, col = {}, observation = {}, reward = {}{}{}\n",
            self.row,
            self.col,
            self.observation,
            self.reward,
            if self.teleported { ", teleported" } else { "" },
            if self.wall_collision {
                ", wall collision"
            } else {
                ""
            }
        );
        for row in 0..self.rows {
            for col in 0..self.cols {
                if row == self.row && col == self.col {
                    out.push('A');
                } else {
                    out.push(self.layout[row][col]);
                }
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(layout: &[&str], rewards: &[&[i32]], encoding: ObservationEncoding) -> MazeConfig {
        MazeConfig {
            layout: layout.iter().map(|s| s.to_string()).collect(),
            rewards: rewards.iter().map(|r| r.to_vec()).collect(),
            observation_encoding: encoding,
        }
    }

    #[test]
    fn rejects_a_maze_without_teleport_squares() {
        let mut rng = AgentRng::seed_from_u64(0);
        let cfg = config(&["&&"], &[&[0, 0]], ObservationEncoding::Uninformative);
        assert!(Maze::new(&cfg, &mut rng).is_err());
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        let mut rng = AgentRng::seed_from_u64(0);
        let cfg = config(&["*&", "&"], &[&[0, 0], &[0, 0]], ObservationEncoding::Walls);
        assert!(Maze::new(&cfg, &mut rng).is_err());
        let cfg = config(&["*&"], &[&[0]], ObservationEncoding::Walls);
        assert!(Maze::new(&cfg, &mut rng).is_err());
    }

    #[test]
    fn rewards_are_normalized_to_start_at_zero() {
        let mut rng = AgentRng::seed_from_u64(0);
        let cfg = config(
            &["*&"],
            &[&[-5, 10]],
            ObservationEncoding::Uninformative,
        );
        let mut maze = Maze::new(&cfg, &mut rng).unwrap();
        assert_eq!(maze.max_reward(), 15);

        // The agent starts on the only teleport square (0, 0); moving right
        // earns the shifted reward of the right square.
        maze.perform_action(Maze::A_RIGHT, &mut rng);
        assert_eq!(maze.reward(), 15);
    }

    #[test]
    fn walls_block_and_still_pay_the_attempted_square() {
        let mut rng = AgentRng::seed_from_u64(0);
        let cfg = config(&["*@"], &[&[1, 0]], ObservationEncoding::Coordinates);
        let mut maze = Maze::new(&cfg, &mut rng).unwrap();
        maze.perform_action(Maze::A_RIGHT, &mut rng);
        // Blocked by the wall: still at column 0, paid the wall square's 0.
        assert_eq!(maze.observation(), 0);
        assert_eq!(maze.reward(), 0);

        // Moving off the grid clamps to the current square.
        maze.perform_action(Maze::A_LEFT, &mut rng);
        assert_eq!(maze.observation(), 0);
        assert_eq!(maze.reward(), 1);
    }

    #[test]
    fn wall_observation_encodes_all_four_sides() {
        let mut rng = AgentRng::seed_from_u64(0);
        let cfg = config(&["*&"], &[&[0, 0]], ObservationEncoding::Walls);
        let mut maze = Maze::new(&cfg, &mut rng).unwrap();
        // At (0, 0) of a 1x2 maze: left, up, and down are edges.
        assert_eq!(
            maze.observation(),
            Maze::O_LEFT_WALL + Maze::O_UP_WALL + Maze::O_DOWN_WALL
        );
        maze.perform_action(Maze::A_RIGHT, &mut rng);
        assert_eq!(
            maze.observation(),
            Maze::O_UP_WALL + Maze::O_RIGHT_WALL + Maze::O_DOWN_WALL
        );
    }

    #[test]
    fn teleport_from_squares_relocate_the_agent() {
        let mut rng = AgentRng::seed_from_u64(0);
        let cfg = config(&["*!"], &[&[0, 0]], ObservationEncoding::Coordinates);
        let mut maze = Maze::new(&cfg, &mut rng).unwrap();
        maze.perform_action(Maze::A_RIGHT, &mut rng);
        // Stepping onto '!' teleports back to the only '*' square.
        assert_eq!(maze.observation(), 0);
    }
}
