//! Arithmetic captcha for registration and login forms
//!
//! The state layer only generates challenges; verifying the user's answer is
//! up to the form that shows it.

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
}

impl Operator {
    pub const ALL: [Operator; 3] = [Self::Add, Self::Subtract, Self::Multiply];

    pub fn symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
        }
    }

    pub fn apply(&self, lhs: i32, rhs: i32) -> i32 {
        match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One challenge with its exact answer (negative for some subtractions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Captcha {
    pub operand1: i32,
    pub operand2: i32,
    pub operator: Operator,
    pub answer: i32,
}

impl Captcha {
    /// Generate a challenge from the thread-local RNG
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rng())
    }

    /// Operands are drawn from 1..=10, the operator uniformly
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let operand1 = rng.random_range(1..=10);
        let operand2 = rng.random_range(1..=10);
        let operator = Operator::ALL[rng.random_range(0..Operator::ALL.len())];
        Self {
            operand1,
            operand2,
            operator,
            answer: operator.apply(operand1, operand2),
        }
    }

    /// Question text, e.g. `"7 - 9"`
    pub fn prompt(&self) -> String {
        format!("{} {} {}", self.operand1, self.operator, self.operand2)
    }

    pub fn check(&self, response: i32) -> bool {
        response == self.answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_answers_are_exact() {
        for _ in 0..1000 {
            let c = Captcha::generate();
            assert!((1..=10).contains(&c.operand1));
            assert!((1..=10).contains(&c.operand2));
            let expected = match c.operator {
                Operator::Add => c.operand1 + c.operand2,
                Operator::Subtract => c.operand1 - c.operand2,
                Operator::Multiply => c.operand1 * c.operand2,
            };
            assert_eq!(c.answer, expected);
            assert!(c.check(expected));
        }
    }

    #[test]
    fn test_all_operators_appear() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 3];
        let mut negative = false;
        for _ in 0..1000 {
            let c = Captcha::generate_with(&mut rng);
            let idx = Operator::ALL.iter().position(|o| *o == c.operator).unwrap();
            seen[idx] = true;
            negative |= c.answer < 0;
        }
        assert_eq!(seen, [true; 3]);
        assert!(negative, "subtraction must be allowed to go below zero");
    }

    #[test]
    fn test_negative_answer_kept() {
        let c = Captcha {
            operand1: 2,
            operand2: 9,
            operator: Operator::Subtract,
            answer: Operator::Subtract.apply(2, 9),
        };
        assert_eq!(c.answer, -7);
        assert_eq!(c.prompt(), "2 - 9");
        assert!(c.check(-7));
        assert!(!c.check(7));
    }

    #[test]
    fn test_operator_serialization() {
        assert_eq!(serde_json::to_string(&Operator::Multiply).unwrap(), "\"*\"");
    }
}
