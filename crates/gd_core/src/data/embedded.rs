//! Default tables compiled into the binary with `include_str!`.
//!
//! `TableStore::embedded()` parses these; `TableStore::load_dir` reads the
//! same layout from disk.

pub const DECKS_JSON: &str = include_str!("../../../../data/tables/decks.json");

pub const TIMEKEEPING_JSON: &str = include_str!("../../../../data/tables/timekeeping.json");

pub const PENALTY_TABLES: &[(&str, &str)] = &[(
    "penalties/standard.json",
    include_str!("../../../../data/tables/penalties/standard.json"),
)];

pub const MATCHUP_TABLES: &[(&str, &str)] = &[
    (
        "matchups/quick_slant__cover_2.json",
        include_str!("../../../../data/tables/matchups/quick_slant__cover_2.json"),
    ),
    (
        "matchups/quick_slant__blitz.json",
        include_str!("../../../../data/tables/matchups/quick_slant__blitz.json"),
    ),
    (
        "matchups/screen_pass__cover_2.json",
        include_str!("../../../../data/tables/matchups/screen_pass__cover_2.json"),
    ),
    (
        "matchups/screen_pass__blitz.json",
        include_str!("../../../../data/tables/matchups/screen_pass__blitz.json"),
    ),
    (
        "matchups/power_run__cover_2.json",
        include_str!("../../../../data/tables/matchups/power_run__cover_2.json"),
    ),
    (
        "matchups/power_run__blitz.json",
        include_str!("../../../../data/tables/matchups/power_run__blitz.json"),
    ),
    (
        "matchups/qb_sneak__cover_2.json",
        include_str!("../../../../data/tables/matchups/qb_sneak__cover_2.json"),
    ),
    (
        "matchups/qb_sneak__blitz.json",
        include_str!("../../../../data/tables/matchups/qb_sneak__blitz.json"),
    ),
];
