//! 숙련도별 대화 장면 목록. 세션은 항상 첫 번째 장면으로 시작합니다.

use crate::models::ProficiencyLevel;

const BEGINNER: [&str; 3] = ["A coffee shop", "A taxi ride", "Ordering food"];
const INTERMEDIATE: [&str; 3] = ["Discussing hobbies", "Travel experiences", "A job interview"];
const ADVANCED: [&str; 3] = ["A business meeting", "Debating politics", "Explaining science"];

/// 숙련도에 해당하는 장면 목록 전체
pub fn scenes(level: ProficiencyLevel) -> &'static [&'static str; 3] {
    match level {
        ProficiencyLevel::Beginner => &BEGINNER,
        ProficiencyLevel::Intermediate => &INTERMEDIATE,
        ProficiencyLevel::Advanced => &ADVANCED,
    }
}

/// 세션의 시작 장면
pub fn scene_for(level: ProficiencyLevel) -> &'static str {
    scenes(level)[0]
}
