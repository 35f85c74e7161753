//! Tictactoe against a uniformly random opponent. The board is observed in
//! base 4 (two bits per square); the game resets after a win, loss, draw,
//! or an invalid move.

use aixi_core::{AgentRng, Environment};

pub struct TicTacToe {
    board: [[u32; 3]; 3],
    actions_since_reset: u32,
    action: u32,
    observation: u32,
    reward: u32,
}

impl TicTacToe {
    pub const O_EMPTY: u32 = 0;
    pub const O_AGENT: u32 = 1;
    pub const O_ENV: u32 = 2;

    pub const R_INVALID: u32 = 0;
    pub const R_LOSS: u32 = 1;
    pub const R_NULL: u32 = 3;
    pub const R_DRAW: u32 = 4;
    pub const R_WIN: u32 = 5;

    pub fn new() -> Self {
        let mut env = Self {
            board: [[Self::O_EMPTY; 3]; 3],
            actions_since_reset: 0,
            action: 0,
            observation: 0,
            reward: 0,
        };
        env.reset();
        env
    }

    fn reset(&mut self) {
        self.board = [[Self::O_EMPTY; 3]; 3];
        self.actions_since_reset = 0;
        self.compute_observation();
    }

    /// Two bits per square, row-major, most significant square first.
    fn compute_observation(&mut self) {
        self.observation = 0;
        for row in 0..3 {
            for col in 0..3 {
                self.observation = self.board[row][col] + 4 * self.observation;
            }
        }
    }

    fn someone_won(&self) -> bool {
        let b = &self.board;
        for i in 0..3 {
            if b[i][0] != Self::O_EMPTY && b[i][0] == b[i][1] && b[i][1] == b[i][2] {
                return true;
            }
            if b[0][i] != Self::O_EMPTY && b[0][i] == b[1][i] && b[1][i] == b[2][i] {
                return true;
            }
        }
        if b[1][1] != Self::O_EMPTY && b[0][0] == b[1][1] && b[1][1] == b[2][2] {
            return true;
        }
        if b[1][1] != Self::O_EMPTY && b[0][2] == b[1][1] && b[1][1] == b[2][0] {
            return true;
        }
        false
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for TicTacToe {
    fn max_action(&self) -> u32 {
        8
    }

    fn max_observation(&self) -> u32 {
        // Nine base-4 digits, each at most 2.
        174_762
    }

    fn max_reward(&self) -> u32 {
        5
    }

    fn observation(&self) -> u32 {
        self.observation
    }

    fn reward(&self) -> u32 {
        self.reward
    }

    fn perform_action(&mut self, action: u32, rng: &mut AgentRng) {
        assert!(self.is_valid_action(action));
        self.action = action;
        self.actions_since_reset += 1;

        let mut row = (action / 3) as usize;
        let mut col = (action % 3) as usize;

        // Moving onto an occupied square forfeits the round.
        if self.board[row][col] != Self::O_EMPTY {
            self.reward = Self::R_INVALID;
            self.reset();
            return;
        }

        self.board[row][col] = Self::O_AGENT;
        if self.someone_won() {
            self.reward = Self::R_WIN;
            self.reset();
            return;
        }
        if self.actions_since_reset == 5 {
            self.reward = Self::R_DRAW;
            self.reset();
            return;
        }

        // The opponent claims a random empty square.
        while self.board[row][col] != Self::O_EMPTY {
            row = rng.rand_range(3) as usize;
            col = rng.rand_range(3) as usize;
        }
        self.board[row][col] = Self::O_ENV;
        if self.someone_won() {
            self.reward = Self::R_LOSS;
            self.reset();
            return;
        }

        self.reward = Self::R_NULL;
        self.compute_observation();
    }

    fn describe(&self) -> String {
        let mut out = format!(
            "action = {}, observation = {}, reward = {}, board:\n",
            self.action, self.observation, self.reward
        );
        for row in 0..3 {
            for col in 0..3 {
                out.push(match self.board[row][col] {
                    Self::O_EMPTY => '.',
                    Self::O_AGENT => 'A',
                    _ => 'O',
                });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Base-4 digit of the observation for a board square, row-major.
    fn square(observation: u32, row: usize, col: usize) -> u32 {
        let index = row * 3 + col;
        (observation / 4u32.pow((8 - index) as u32)) % 4
    }

    #[test]
    fn max_observation_is_the_all_env_board() {
        let mut expected = 0u32;
        for _ in 0..9 {
            expected = TicTacToe::O_ENV + 4 * expected;
        }
        assert_eq!(expected, 174_762);
    }

    #[test]
    fn observation_encodes_the_agent_move() {
        let mut rng = AgentRng::seed_from_u64(0);
        let mut env = TicTacToe::new();
        env.perform_action(4, &mut rng); // center square
        if env.reward() == TicTacToe::R_NULL {
            assert_eq!(square(env.observation(), 1, 1), TicTacToe::O_AGENT);
            // Exactly one opponent mark somewhere.
            let env_marks: u32 = (0..9)
                .filter(|&i| square(env.observation(), i / 3, i % 3) == TicTacToe::O_ENV)
                .count() as u32;
            assert_eq!(env_marks, 1);
        }
    }

    #[test]
    fn replaying_a_square_is_invalid_and_resets() {
        let mut rng = AgentRng::seed_from_u64(1);
        let mut env = TicTacToe::new();
        env.perform_action(0, &mut rng);
        if env.reward() == TicTacToe::R_NULL && square(env.observation(), 0, 0) == TicTacToe::O_AGENT
        {
            env.perform_action(0, &mut rng);
            assert_eq!(env.reward(), TicTacToe::R_INVALID);
            assert_eq!(env.observation(), 0); // cleared board
        }
    }

    #[test]
    fn rewards_stay_on_declared_values() {
        let mut rng = AgentRng::seed_from_u64(2);
        let mut env = TicTacToe::new();
        for i in 0..500 {
            env.perform_action(i % 9, &mut rng);
            assert!(matches!(
                env.reward(),
                TicTacToe::R_INVALID
                    | TicTacToe::R_LOSS
                    | TicTacToe::R_NULL
                    | TicTacToe::R_DRAW
                    | TicTacToe::R_WIN
            ));
        }
    }
}
