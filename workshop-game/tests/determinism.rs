use chrono::NaiveDate;
use workshop_game::constants::STORE_KEY;
use workshop_game::{ActionId, ActionParams, FixedClock, MemoryStore, Mulberry32, Workshop, daily_seed};

const SCRIPT: [ActionId; 6] = [
    ActionId::Tinker,
    ActionId::ChatWithAssistant,
    ActionId::GatherParts,
    ActionId::ProcessMaterials,
    ActionId::ReviewProject,
    ActionId::CraftUselessMachine,
];

fn play(date: NaiveDate) -> (Vec<String>, String) {
    let mut workshop = Workshop::open(MemoryStore::new(), FixedClock::new(date)).unwrap();
    let mut messages = vec![workshop.last_message().to_string()];
    for _ in 0..3 {
        for action in SCRIPT {
            messages.push(
                workshop
                    .dispatch(action, &ActionParams::default())
                    .unwrap(),
            );
        }
        messages.push(workshop.advance_day().unwrap());
    }
    let blob = workshop_game::schema::encode(workshop.state()).unwrap();
    (messages, blob)
}

#[test]
fn identical_dates_replay_identically() {
    let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    assert_eq!(play(date), play(date));
}

#[test]
fn different_dates_diverge() {
    let (first, _) = play(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
    let (second, _) = play(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
    assert_ne!(first, second);
}

#[test]
fn reloads_restart_the_day_stream() {
    let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let clock = FixedClock::new(date);
    let store = MemoryStore::new();
    Workshop::open(store.clone(), clock.clone()).unwrap();
    let saved = store.get(STORE_KEY).unwrap();

    let replay = || {
        let store = MemoryStore::new();
        store.insert(STORE_KEY, saved.clone());
        let mut workshop = Workshop::open(store, clock.clone()).unwrap();
        let message = workshop
            .dispatch(ActionId::Tinker, &ActionParams::default())
            .unwrap();
        (message, workshop.state().clone())
    };
    assert_eq!(replay(), replay());
}

#[test]
fn day_seed_offsets_by_logical_day() {
    let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    assert_eq!(daily_seed(date), 20_261_019);
    assert_eq!(Mulberry32::for_day(date, 0), Mulberry32::new(20_261_019));
    assert_eq!(Mulberry32::for_day(date, 3), Mulberry32::new(20_261_022));
}
