//! Turn phases and steps

use serde::{Deserialize, Serialize};

/// Major phases of a turn; `Setup` runs once before the first turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Setup,
    Beginning,
    PrecombatMain,
    Combat,
    PostcombatMain,
    Ending,
}

impl Phase {
    /// First step executed when the phase begins
    pub fn first_step(&self) -> Step {
        match self {
            Phase::Setup => Step::Setup,
            Phase::Beginning => Step::Switch,
            Phase::PrecombatMain => Step::Main1,
            Phase::Combat => Step::DeclareAttackers,
            Phase::PostcombatMain => Step::Main2,
            Phase::Ending => Step::End,
        }
    }
}

/// Specific steps within phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    Setup,

    // Beginning
    Switch,
    Untap,
    Upkeep,
    Draw,

    Main1,

    // Combat
    DeclareAttackers,
    DeclareBlockers,
    CombatDamage,

    Main2,

    // Ending
    End,
    Cleanup,
}

impl Step {
    pub fn phase(&self) -> Phase {
        match self {
            Step::Setup => Phase::Setup,
            Step::Switch | Step::Untap | Step::Upkeep | Step::Draw => Phase::Beginning,
            Step::Main1 => Phase::PrecombatMain,
            Step::DeclareAttackers | Step::DeclareBlockers | Step::CombatDamage => Phase::Combat,
            Step::Main2 => Phase::PostcombatMain,
            Step::End | Step::Cleanup => Phase::Ending,
        }
    }

    /// Next step in turn order; Cleanup wraps to the next turn's Switch
    pub fn next(&self) -> Step {
        match self {
            Step::Setup => Step::Switch,
            Step::Switch => Step::Untap,
            Step::Untap => Step::Upkeep,
            Step::Upkeep => Step::Draw,
            Step::Draw => Step::Main1,
            Step::Main1 => Step::DeclareAttackers,
            Step::DeclareAttackers => Step::DeclareBlockers,
            Step::DeclareBlockers => Step::CombatDamage,
            Step::CombatDamage => Step::Main2,
            Step::Main2 => Step::End,
            Step::End => Step::Cleanup,
            Step::Cleanup => Step::Switch,
        }
    }

    /// Steps with a priority loop (lands and sorcery-speed spells allowed)
    pub fn is_main(&self) -> bool {
        matches!(self, Step::Main1 | Step::Main2)
    }

    /// Last step of its phase
    pub fn ends_phase(&self) -> bool {
        self.next().phase() != self.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_phases() {
        assert_eq!(Step::Untap.phase(), Phase::Beginning);
        assert_eq!(Step::Main1.phase(), Phase::PrecombatMain);
        assert_eq!(Step::CombatDamage.phase(), Phase::Combat);
        assert_eq!(Step::Main2.phase(), Phase::PostcombatMain);
        assert_eq!(Step::Cleanup.phase(), Phase::Ending);
    }

    #[test]
    fn test_full_turn_cycle() {
        let mut step = Step::Setup.next();
        let mut phases = vec![step.phase()];
        let mut count = 1;
        while step != Step::Cleanup {
            step = step.next();
            if phases.last() != Some(&step.phase()) {
                phases.push(step.phase());
            }
            count += 1;
        }
        assert_eq!(count, 11);
        assert_eq!(
            phases,
            vec![
                Phase::Beginning,
                Phase::PrecombatMain,
                Phase::Combat,
                Phase::PostcombatMain,
                Phase::Ending
            ]
        );
        assert_eq!(Step::Cleanup.next(), Step::Switch);
    }

    #[test]
    fn test_first_steps_and_boundaries() {
        assert_eq!(Phase::Combat.first_step(), Step::DeclareAttackers);
        assert!(Step::Draw.ends_phase());
        assert!(!Step::Untap.ends_phase());
        assert!(Step::Setup.ends_phase());
        assert!(Step::Main2.is_main());
    }
}
