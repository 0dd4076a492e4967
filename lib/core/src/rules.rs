//! Static naming-convention tables
//!
//! Four kinds of rules feed the rule-based classifier:
//!
//! - [`PrefixRule`]: vendor category codes such as `AMBUrbn` or `GUNRif`
//! - [`VendorRule`]: anchored regexes tested against the filename stem
//! - [`PhraseRule`]: substrings searched in the normalized folder + filename text
//! - [`TokenRule`]: whole words counted in the word-token set
//!
//! All tables are compiled once per process and never mutated.

use std::sync::LazyLock;

use ahash::AHashMap;
use regex::Regex;

/// A (Tier1, Tier2) category pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tiers {
    pub tier1: &'static str,
    pub tier2: &'static str,
}

impl Tiers {
    pub const fn new(tier1: &'static str, tier2: &'static str) -> Self {
        Self { tier1, tier2 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PrefixRule {
    pub prefix: &'static str,
    pub tiers: Tiers,
}

#[derive(Debug, Clone)]
pub struct VendorRule {
    pub pattern: Regex,
    pub tiers: Tiers,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct PhraseRule {
    pub tiers: Tiers,
    /// Lowercase, already in normalized form
    pub phrases: &'static [&'static str],
    pub weight_per_hit: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct TokenRule {
    pub tiers: Tiers,
    /// Lowercase word tokens, in their synonym-normalized spelling
    pub tokens: &'static [&'static str],
    pub weight_per_hit: f64,
}

/// Shortest prefix still worth looking up ("AMB", "GUN", "VEH", ...)
pub const MIN_PREFIX_LEN: usize = 3;

const fn prefix(prefix: &'static str, tier1: &'static str, tier2: &'static str) -> PrefixRule {
    PrefixRule { prefix, tiers: Tiers::new(tier1, tier2) }
}

pub const PREFIX_RULES: &[PrefixRule] = &[
    // Ambient
    prefix("AMB", "Ambient", "Ambience"),
    prefix("AMBUrbn", "Ambient", "Ambience/Urban"),
    prefix("AMBTown", "Ambient", "Ambience/Town"),
    prefix("AMBForst", "Ambient", "Ambience/Forest"),
    prefix("AMBTran", "Ambient", "Ambience/Transport"),
    prefix("AMBCnst", "Ambient", "Ambience/Construction"),
    prefix("AMBInd", "Ambient", "Ambience/Industrial"),
    prefix("AMBRoom", "Ambient", "Ambience/Roomtone"),
    prefix("AMBPubl", "Ambient", "Ambience/Public"),
    prefix("AMBNaut", "Ambient", "Ambience/Nautical"),
    prefix("AMBRest", "Ambient", "Ambience/Restaurant"),
    prefix("AMBUndr", "Ambient", "Ambience/Underground"),
    prefix("AMBOffc", "Ambient", "Ambience/Office"),
    prefix("AMBMisc", "Ambient", "Ambience/Misc"),
    prefix("AMBDsgn", "Ambient", "Ambience/Designed"),
    // Weather
    prefix("RAIN", "Weather", "Rain"),
    prefix("RAINVege", "Weather", "Rain"),
    prefix("WIND", "Weather", "Wind"),
    prefix("WINDVege", "Weather", "Wind"),
    // Water
    prefix("WATR", "Water", "General"),
    prefix("WATRFlow", "Water", "Flow"),
    prefix("WATRWave", "Water", "Waves"),
    prefix("WATRSurf", "Water", "Surf"),
    prefix("WATRLap", "Water", "Lapping"),
    prefix("WATRDrip", "Water", "Drips"),
    prefix("WATRDran", "Water", "Drains"),
    prefix("WATRImpt", "Water", "Impacts"),
    prefix("WATRMvmt", "Water", "Movement"),
    prefix("WATRUndwtr", "Water", "Underwater"),
    prefix("WATRFizz", "Water", "Fizz"),
    prefix("AMBUndwtr", "Water", "Underwater"),
    // UI
    prefix("UI", "UI", "General"),
    prefix("UIClick", "UI", "Clicks"),
    prefix("UIData", "UI", "Data"),
    prefix("UIAlert", "UI", "Alerts"),
    prefix("UIMvmt", "UI", "Movement"),
    prefix("UIMisc", "UI", "Misc"),
    // Weapons
    prefix("GUN", "Weapons", "Guns"),
    prefix("GUNRif", "Weapons", "Guns/Rifle"),
    prefix("GUNShotg", "Weapons", "Guns/Shotgun"),
    prefix("GUNMech", "Weapons", "Guns/Mechanics"),
    prefix("WEAP", "Weapons", "General"),
    prefix("WEAPSwrd", "Weapons", "Melee/Sword"),
    prefix("WEAPAxe", "Weapons", "Melee/Axe"),
    prefix("WEAPArmr", "Weapons", "Armor/Blocks"),
    prefix("SCIWeap", "Weapons", "SciFi"),
    // Vehicles
    prefix("VEH", "Vehicles", "General"),
    prefix("VEHCar", "Vehicles", "Cars"),
    prefix("VEHFarm", "Vehicles", "Farm"),
    prefix("VEHAtv", "Vehicles", "ATV"),
    prefix("VEHTire", "Vehicles", "Tires"),
    prefix("VEHDoor", "Vehicles", "Doors"),
    prefix("VEHHorn", "Vehicles", "Horns"),
    prefix("TRN", "Vehicles", "Trains"),
    prefix("TRNSbwy", "Vehicles", "Subway"),
    prefix("TRNTram", "Vehicles", "Tram"),
    prefix("BOAT", "Vehicles", "Boats"),
    prefix("BOATMotr", "Vehicles", "Boats/Motor"),
    prefix("BOATWash", "Vehicles", "Boats/Wash"),
    prefix("BOATMech", "Vehicles", "Boats/Mechanics"),
    prefix("BOATInt", "Vehicles", "Boats/Interior"),
    // Foley
    prefix("FOLY", "Foley", "General"),
    prefix("OBJ", "Foley", "Objects"),
    prefix("TOOL", "Foley", "Tools"),
    prefix("CLOTH", "Foley", "Cloth"),
    prefix("WOOD", "Foley", "Wood"),
    prefix("METL", "Foley", "Metal"),
    prefix("GLAS", "Foley", "Glass"),
    prefix("PAPR", "Foley", "Paper"),
    prefix("BELL", "Foley", "Bells"),
    prefix("MACH", "Foley", "Machines"),
    prefix("MECH", "Foley", "Mechanisms"),
    // Doors
    prefix("DOOR", "Doors", "General"),
    prefix("DOORCreak", "Doors", "Creaks"),
    prefix("DOORGate", "Doors", "Gates"),
    prefix("DOORHydr", "Doors", "Hydraulic"),
    // Design
    prefix("DSGN", "Design", "General"),
    prefix("DSGNRise", "Design", "Risers"),
    prefix("DSGNBoom", "Design", "Booms/Hits"),
    prefix("DSGNDron", "Design", "Drones"),
    prefix("DSGNErie", "Design", "Eerie"),
    prefix("DSGNBram", "Design", "Braams"),
    prefix("DSGNTonl", "Design", "Tonal"),
    prefix("DSGNSrce", "Design", "Source"),
    prefix("WHSH", "Design", "Whooshes"),
    prefix("WHOOSH", "Design", "Whooshes"),
    // Electrical / SciFi
    prefix("ELEC", "Electrical", "General"),
    prefix("ELECEmf", "Electrical", "EMF/Hum"),
    prefix("SCIMisc", "SciFi", "Misc"),
    prefix("SCIMech", "SciFi", "Mechanics"),
    // Animals
    prefix("ANML", "Animals", "General"),
    prefix("BIRD", "Animals", "Birds"),
    prefix("BIRDSong", "Animals", "Birds/Song"),
    prefix("BIRDPrey", "Animals", "Birds/Prey"),
    prefix("BIRDFowl", "Animals", "Birds/Fowl"),
    prefix("CREA", "Animals", "Creatures"),
    prefix("GRWL", "Animals", "Growls"),
    prefix("ROAR", "Animals", "Roars"),
    // Gore
    prefix("GORE", "Gore", "General"),
    prefix("GOREBone", "Gore", "Bone"),
    prefix("GOREFlsh", "Gore", "Flesh"),
    prefix("GORESplt", "Gore", "Splatter"),
    // Music
    prefix("MUSC", "Music", "General"),
    prefix("MUSCStngr", "Music", "Stingers"),
];

// (pattern, tier1, tier2, weight). Patterns run against the raw stem.
const VENDOR_PATTERNS: &[(&str, &str, &str, f64)] = &[
    (r"(?i)^foot\s?steps?\b", "Foley", "Footsteps", 40.0),
    (r"(?i)^(whoosh|swoosh|swish|woosh)", "Design", "Whooshes", 40.0),
    (r"(?i)^(ui|menu|button)[ _-]?(click|select|confirm|hover|back)", "UI", "Clicks", 45.0),
    (r"(?i)^(car|truck|bus|motorcycle|van)s?[ _-]?(pass|by|drive|idle|rev|start)", "Vehicles", "Cars", 40.0),
    (r"(?i)^(thunder|storm)", "Weather", "Thunder", 45.0),
    (r"(?i)^(dog|cat|horse|cow|sheep)s?[ _-]?(bark|meow|purr|neigh|moo|bleat|growl)", "Animals", "Domestic", 45.0),
    (r"(?i)^(punch|kick|slap|body[ _-]?fall)", "Foley", "Body Hits", 40.0),
    (r"(?i)^(crowd|walla)", "Ambient", "Crowds", 40.0),
    (r"(?i)^(alarm|siren|klaxon)", "Alarms", "General", 40.0),
    (r"(?i)^(laser|blaster|phaser)", "Weapons", "SciFi", 45.0),
    (r"(?i)^(sword|blade|knife)[ _-]?(swing|slash|draw|unsheathe?|clash)", "Weapons", "Melee/Sword", 45.0),
    (r"(?i)^(gun|rifle|pistol|shotgun)[ _-]?(shot|fire|reload|cock|mag)", "Weapons", "Guns", 45.0),
];

/// Weight for one matched phrase
const PHRASE_WEIGHT: f64 = 24.0;
/// Weight for one matched word token
const TOKEN_WEIGHT: f64 = 14.0;

pub const PHRASE_RULES: &[PhraseRule] = &[
    PhraseRule {
        tiers: Tiers::new("Foley", "Footsteps"),
        phrases: &["foot step", "footstep"],
        weight_per_hit: PHRASE_WEIGHT,
    },
    PhraseRule {
        tiers: Tiers::new("Vehicles", "General"),
        phrases: &["pass by", "passby", "drive by", "on board", "onboard", "gear shift", "gearshift"],
        weight_per_hit: PHRASE_WEIGHT,
    },
    PhraseRule {
        tiers: Tiers::new("Ambient", "Ambience"),
        phrases: &["room tone", "roomtone", "city ambience", "forest ambience", "night ambience", "crowd walla"],
        weight_per_hit: PHRASE_WEIGHT,
    },
    PhraseRule {
        tiers: Tiers::new("Design", "Whooshes"),
        phrases: &["whoosh", "swoosh", "fly by", "flyby"],
        weight_per_hit: PHRASE_WEIGHT,
    },
    PhraseRule {
        tiers: Tiers::new("Design", "Risers"),
        phrases: &["riser", "rising tension", "build up"],
        weight_per_hit: PHRASE_WEIGHT,
    },
    PhraseRule {
        tiers: Tiers::new("Water", "General"),
        phrases: &["underwater", "water drip", "waves crash", "river flow"],
        weight_per_hit: PHRASE_WEIGHT,
    },
    PhraseRule {
        tiers: Tiers::new("Voices", "General"),
        phrases: &["voice over", "voiceover", "dialogue", "announcement", "tannoy"],
        weight_per_hit: PHRASE_WEIGHT,
    },
    PhraseRule {
        tiers: Tiers::new("UI", "General"),
        phrases: &["user interface", "menu select", "button press"],
        weight_per_hit: PHRASE_WEIGHT,
    },
    PhraseRule {
        tiers: Tiers::new("Electrical", "General"),
        phrases: &["electric hum", "power surge", "electrical interference", "high voltage"],
        weight_per_hit: PHRASE_WEIGHT,
    },
    PhraseRule {
        tiers: Tiers::new("Weapons", "Guns"),
        phrases: &["gun shot", "gunshot", "gun fire", "gunfire", "bullet whiz"],
        weight_per_hit: PHRASE_WEIGHT,
    },
];

pub const TOKEN_RULES: &[TokenRule] = &[
    TokenRule {
        tiers: Tiers::new("Foley", "Footsteps"),
        tokens: &["footstep", "walk", "walking", "run", "running", "sneak"],
        weight_per_hit: TOKEN_WEIGHT,
    },
    TokenRule {
        tiers: Tiers::new("UI", "General"),
        tokens: &["interface", "button", "click", "menu", "select", "beep", "alert", "confirm", "cursor", "glitch"],
        weight_per_hit: TOKEN_WEIGHT,
    },
    TokenRule {
        tiers: Tiers::new("Weapons", "General"),
        tokens: &["gun", "gunshot", "reload", "weapon", "rifle", "pistol", "cannon", "grenade", "firing"],
        weight_per_hit: TOKEN_WEIGHT,
    },
    TokenRule {
        tiers: Tiers::new("Vehicles", "General"),
        tokens: &[
            "car", "engine", "truck", "vehicle", "motor", "rpm", "onboard", "onbrd", "drive", "horn", "exhaust",
            "gearshift", "passby",
        ],
        weight_per_hit: TOKEN_WEIGHT,
    },
    TokenRule {
        tiers: Tiers::new("Ambient", "Ambience"),
        tokens: &["ambience", "roomtone", "walla", "crowd", "station", "forest", "city", "subway"],
        weight_per_hit: TOKEN_WEIGHT,
    },
    TokenRule {
        tiers: Tiers::new("Water", "General"),
        tokens: &["water", "creek", "brook", "river", "wave", "splash", "drip", "underwater", "ocean"],
        weight_per_hit: TOKEN_WEIGHT,
    },
    TokenRule {
        tiers: Tiers::new("Doors", "General"),
        tokens: &["door", "gate", "hatch", "open", "creak"],
        weight_per_hit: TOKEN_WEIGHT,
    },
    TokenRule {
        tiers: Tiers::new("Foley", "General"),
        tokens: &["foley", "handling", "grab", "drop", "cloth", "wood", "metal", "glass", "paper", "plastic"],
        weight_per_hit: TOKEN_WEIGHT,
    },
    TokenRule {
        tiers: Tiers::new("Design", "General"),
        tokens: &["riser", "whoosh", "hit", "boom", "cinematic", "trailer", "transition", "impact", "stinger"],
        weight_per_hit: TOKEN_WEIGHT,
    },
    TokenRule {
        tiers: Tiers::new("Voices", "General"),
        tokens: &["voice", "dialog", "dialogue", "announcement", "tannoy", "shout", "scream", "talk"],
        weight_per_hit: TOKEN_WEIGHT,
    },
    TokenRule {
        tiers: Tiers::new("Animals", "General"),
        tokens: &["bird", "dog", "cat", "pig", "goose", "rooster", "animal", "growl", "roar"],
        weight_per_hit: TOKEN_WEIGHT,
    },
    TokenRule {
        tiers: Tiers::new("Electrical", "General"),
        tokens: &["electric", "electrical", "emf", "hum", "interference", "arc", "discharge", "zap"],
        weight_per_hit: TOKEN_WEIGHT,
    },
    TokenRule {
        tiers: Tiers::new("Weather", "General"),
        tokens: &["rain", "wind", "thunder", "storm", "hail", "drizzle"],
        weight_per_hit: TOKEN_WEIGHT,
    },
];

/// The compiled rule tables
#[derive(Debug)]
pub struct RuleSet {
    prefixes: AHashMap<String, Tiers>,
    pub vendors: Vec<VendorRule>,
    pub phrases: &'static [PhraseRule],
    pub tokens: &'static [TokenRule],
}

static BUILTIN: LazyLock<RuleSet> = LazyLock::new(|| RuleSet {
    prefixes: PREFIX_RULES
        .iter()
        .map(|rule| (rule.prefix.to_lowercase(), rule.tiers))
        .collect(),
    vendors: VENDOR_PATTERNS
        .iter()
        .map(|&(pattern, tier1, tier2, weight)| VendorRule {
            pattern: Regex::new(pattern).expect("built-in vendor pattern must compile"),
            tiers: Tiers::new(tier1, tier2),
            weight,
        })
        .collect(),
    phrases: PHRASE_RULES,
    tokens: TOKEN_RULES,
});

impl RuleSet {
    /// The process-wide built-in tables
    pub fn builtin() -> &'static RuleSet {
        &BUILTIN
    }

    /// Exact, case-insensitive prefix lookup
    pub fn prefix(&self, token: &str) -> Option<Tiers> {
        self.prefixes.get(&token.to_lowercase()).copied()
    }

    /// Exact lookup first, then trim characters from the right down to
    /// `MIN_PREFIX_LEN`; the longest hit wins.
    pub fn lookup_prefix(&self, token: &str) -> Option<Tiers> {
        let lower = token.to_lowercase();
        if let Some(tiers) = self.prefixes.get(&lower) {
            return Some(*tiers);
        }

        let boundaries: Vec<usize> = lower
            .char_indices()
            .map(|(idx, _)| idx)
            .skip(MIN_PREFIX_LEN)
            .collect();

        boundaries
            .into_iter()
            .rev()
            .find_map(|end| self.prefixes.get(&lower[..end]).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_compile() {
        let rules = RuleSet::builtin();
        assert_eq!(rules.vendors.len(), VENDOR_PATTERNS.len());
        assert!(!rules.phrases.is_empty());
        assert!(!rules.tokens.is_empty());
    }

    #[test]
    fn test_prefix_keys_are_unique_case_insensitively() {
        let rules = RuleSet::builtin();
        assert_eq!(rules.prefixes.len(), PREFIX_RULES.len());
    }

    #[test]
    fn test_lookup_prefix_exact_and_shrinking() {
        let rules = RuleSet::builtin();
        assert_eq!(
            rules.lookup_prefix("AMBUrbn"),
            Some(Tiers::new("Ambient", "Ambience/Urban"))
        );
        assert_eq!(
            rules.lookup_prefix("ambUrbnX"),
            Some(Tiers::new("Ambient", "Ambience/Urban"))
        );
        assert_eq!(rules.lookup_prefix("GUNShotgun"), Some(Tiers::new("Weapons", "Guns/Shotgun")));
        assert_eq!(rules.lookup_prefix("AMBZ"), Some(Tiers::new("Ambient", "Ambience")));
        assert_eq!(rules.lookup_prefix("UI"), Some(Tiers::new("UI", "General")));
    }

    #[test]
    fn test_lookup_prefix_stops_at_three_chars() {
        let rules = RuleSet::builtin();
        assert_eq!(rules.lookup_prefix("Xk92"), None);
        assert_eq!(rules.lookup_prefix("UIX"), None);
        assert_eq!(rules.lookup_prefix(""), None);
    }

    #[test]
    fn test_vendor_patterns_are_anchored() {
        let rules = RuleSet::builtin();
        let thunder = rules
            .vendors
            .iter()
            .find(|r| r.tiers == Tiers::new("Weather", "Thunder"))
            .unwrap();
        assert!(thunder.pattern.is_match("Thunder_Rumble_01"));
        assert!(!thunder.pattern.is_match("Distant_Thunder_01"));
    }
}
