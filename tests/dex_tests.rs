use pokemon_matchup_sim::dex::{
    Dex, DexError, ReferenceData, MOVES_FILE, STATS_FILE, TYPE_MODIFIERS_FILE,
};
use pokemon_matchup_sim::model::DamageClass;
use pokemon_matchup_sim::pokemon::Pokemon;
use std::fs;
use std::path::Path;

const STATS_CSV: &str = "\
pokemon,types,hp,attack,defense,special-attack,special-defense,speed
Pikachu,electric,35,55,40,50,50,90
gastly,\"ghost,poison\",30,35,30,100,35,80
";

const MOVES_CSV: &str = "\
pokemon,move_name,move_type,move_category,move_damage_class,move_power,move_crit_rate,move_pp,move_min_hits,move_max_hits
pikachu,thunder-shock,electric,damage+ailment,special,40,0,30,,
pikachu,double-slap,normal,damage,physical,15,0,10,2,5
pikachu,thunder-wave,electric,ailment,status,,0,20,,
gastly,lick,ghost,damage+ailment,physical,30,0,30,,
gastly,lick,ghost,damage+ailment,physical,30,0,30,,
gastly,night-shade,ghost,damage,special,,0,15,,
";

const TYPES_CSV: &str = "\
attack_type,Normal,Electric,Ghost,Poison
Normal,1,1,0,1
Ghost,0,1,2,1
Electric,1,0.5,1,1
";

fn write_tables(dir: &Path, stats: &str, moves: &str, types: &str) {
    fs::write(dir.join(STATS_FILE), stats).unwrap();
    fs::write(dir.join(MOVES_FILE), moves).unwrap();
    fs::write(dir.join(TYPE_MODIFIERS_FILE), types).unwrap();
}

#[test]
fn loads_csv_tables() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path(), STATS_CSV, MOVES_CSV, TYPES_CSV);
    let dex = Dex::from_csv_dir(dir.path()).unwrap();

    assert_eq!(dex.names(), vec!["gastly", "pikachu"]);
    let gastly = &dex.stats_for("Gastly")[0];
    assert_eq!(gastly.types, vec!["ghost", "poison"]);
    assert_eq!(gastly.special_attack, 100);

    let pikachu_moves = dex.moves_for("pikachu");
    assert_eq!(pikachu_moves.len(), 3);
    let double_slap = &pikachu_moves[1];
    assert_eq!(double_slap.hit_range(), Some((2, 5)));
    assert_eq!(pikachu_moves[2].power, None);
    assert_eq!(pikachu_moves[2].damage_class, DamageClass::Status);
    assert_eq!(dex.moves_for("gastly").len(), 2, "duplicate rows are dropped");

    assert_eq!(dex.type_modifier("ghost", "ghost"), Some(2.0));
    assert_eq!(dex.type_modifier("NORMAL", "ghost"), Some(0.0));
    assert_eq!(dex.type_modifier("electric", "electric"), Some(0.5));
    assert_eq!(dex.type_modifier("fire", "ghost"), None);
}

#[test]
fn loaded_pokemon_are_battle_ready() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path(), STATS_CSV, MOVES_CSV, TYPES_CSV);
    let dex = Dex::from_csv_dir(dir.path()).unwrap();
    let gastly = Pokemon::new("gastly", &dex).unwrap();
    assert!(gastly.has_moves());
    let night_shade = gastly
        .all_moves()
        .iter()
        .find(|mv| mv.name == "night-shade")
        .unwrap();
    assert_eq!(night_shade.power, 1);
}

#[test]
fn loads_moves_table_with_float_counts_and_gaps() {
    let dir = tempfile::tempdir().unwrap();
    let moves = "\
pokemon,move_name,move_type,move_category,move_damage_class,move_power,move_crit_rate,move_pp,move_min_hits,move_max_hits,move_url
pikachu,double-slap,normal,damage,physical,15.0,0,10.0,2.0,5.0,https://pokeapi.co/api/v2/move/3/
pikachu,thunder-wave,electric,ailment,status,,,20.0,,,https://pokeapi.co/api/v2/move/86/
gastly,night-shade,ghost,damage,special,,0.0,15.0,,,https://pokeapi.co/api/v2/move/101/
";
    write_tables(dir.path(), STATS_CSV, moves, TYPES_CSV);
    let dex = Dex::from_csv_dir(dir.path()).unwrap();

    let pikachu_moves = dex.moves_for("pikachu");
    assert_eq!(pikachu_moves[0].power, Some(15));
    assert_eq!(pikachu_moves[0].pp, 10);
    assert_eq!(pikachu_moves[0].hit_range(), Some((2, 5)));
    assert_eq!(pikachu_moves[1].power, None);
    assert_eq!(pikachu_moves[1].crit_rate, 0);
    assert_eq!(pikachu_moves[1].hit_range(), None);

    let gastly = Pokemon::new("gastly", &dex).unwrap();
    assert_eq!(gastly.all_moves()[0].pp, 15);
    assert_eq!(gastly.all_moves()[0].power, 1);
}

#[test]
fn fractional_pp_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let moves = "\
pokemon,move_name,move_type,move_category,move_damage_class,move_power,move_crit_rate,move_pp,move_min_hits,move_max_hits
pikachu,thunder-shock,electric,damage,special,40,0,30.5,,
";
    write_tables(dir.path(), STATS_CSV, moves, TYPES_CSV);
    let err = Dex::from_csv_dir(dir.path()).unwrap_err();
    assert!(matches!(err, DexError::Csv { .. }), "unexpected error {err}");
}

#[test]
fn unknown_column_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let stats = "\
pokemon,types,hp,attack,defense,special-attack,special-defense,speed,ability
pikachu,electric,35,55,40,50,50,90,static
";
    write_tables(dir.path(), stats, MOVES_CSV, TYPES_CSV);
    let err = Dex::from_csv_dir(dir.path()).unwrap_err();
    assert!(matches!(err, DexError::Csv { .. }), "unexpected error {err}");
}

#[test]
fn bad_type_modifier_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let types = "\
attack_type,Normal
Normal,lots
";
    write_tables(dir.path(), STATS_CSV, MOVES_CSV, types);
    let err = Dex::from_csv_dir(dir.path()).unwrap_err();
    assert!(matches!(err, DexError::BadModifier { .. }));
}

#[test]
fn missing_tables_surface_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = Dex::from_csv_dir(dir.path()).unwrap_err();
    assert!(err.to_string().contains(STATS_FILE));
}

#[test]
fn loads_json_bundle() {
    let raw = r#"{
        "pokemon": [
            {"pokemon": "Onix", "types": ["rock", "ground"], "hp": 35, "attack": 45, "defense": 160,
             "special_attack": 30, "special_defense": 45, "speed": 70}
        ],
        "moves": [
            {"pokemon": "onix", "name": "rock-throw", "type": "rock", "category": "damage",
             "damage_class": "physical", "power": 50, "crit_rate": 0, "pp": 15}
        ],
        "type_chart": {"Water": {"Rock": 2.0, "Ground": 2.0}}
    }"#;
    let dex = Dex::from_json_str(raw).unwrap();
    let onix = Pokemon::new("onix", &dex).unwrap();
    assert_eq!(onix.types, vec!["rock", "ground"]);
    assert_eq!(onix.all_moves()[0].hits, None);
    assert_eq!(dex.type_modifier("water", "rock"), Some(2.0));
}

#[test]
fn json_bundle_rejects_unknown_fields() {
    let raw = r#"{"pokemon": [], "moves": [], "items": []}"#;
    assert!(matches!(Dex::from_json_str(raw), Err(DexError::Json(_))));
}
