//! 셸 하단에 보여줄 동기부여 문구

use rand_core::{OsRng, RngCore};

pub const QUOTES: [&str; 10] = [
    "Practice regularly for the best results! 🌟 Even 10 minutes a day can lead to significant improvement.",
    "The best way to learn a language is to make mistakes. Keep going! 💪",
    "Learning a new language opens up a whole new world of possibilities. 🌎",
    "Consistency beats perfection. A little practice each day adds up to big results! ✨",
    "Every conversation is a step forward in your language journey. 👣",
    "Language learning is a marathon, not a sprint. Enjoy the process! 🏃‍♀️",
    "The more you speak, the more confident you become. Keep practicing! 🗣️",
    "Don't worry about mistakes - they're your best teachers in language learning. 📚",
    "You're building neural pathways with every new word you learn! 🧠",
    "Bilingual people have stronger cognitive abilities. You're getting smarter! 🧠✨",
];

/// 문구 하나를 무작위로 고릅니다.
pub fn random_quote() -> &'static str {
    let index = OsRng.next_u32() as usize % QUOTES.len();
    QUOTES[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_quote_comes_from_the_list() {
        for _ in 0..20 {
            assert!(QUOTES.contains(&random_quote()));
        }
    }
}
