//! The ECS section of a vehicle scenario file.

use ecs_systems::ScenarioRecord;

pub const SECTION_BEGIN: &str = "BEGIN_ECS";
pub const SECTION_END: &str = "END_ECS";

/// Records between `BEGIN_ECS` and `END_ECS`. Everything outside the
/// section belongs to other vehicle systems and is skipped.
pub fn ecs_records(text: &str) -> Vec<ScenarioRecord<'_>> {
    let mut inside = false;
    let mut records = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        match line {
            SECTION_BEGIN => inside = true,
            SECTION_END => inside = false,
            _ if inside => records.extend(ScenarioRecord::parse(line)),
            _ => {}
        }
    }
    records
}
