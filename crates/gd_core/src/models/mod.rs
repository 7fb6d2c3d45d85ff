pub mod events;
pub mod play;
pub mod report;

pub use events::{
    ChoiceKind, FlowEvent, PenaltyChoice, PenaltyChoiceMeta, ScoreEvent, ScoreKind,
};
pub use play::{
    DefensiveSelection, KickoffKind, OffensivePlaySelection, PatKind, PenaltyDecision, PlayCall,
    SpecialTeamsCall,
};
pub use report::{DiceRoll, PenaltyInfo, PenaltyOn, PlayKind, PlayReport};
