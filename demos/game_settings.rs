use std::thread;

use singletonrs::{Difficulty, GameSettings, LazySingletonHolder};

static SETTINGS: LazySingletonHolder<GameSettings> = LazySingletonHolder::new(GameSettings::new);

fn print(label: &str, settings: &GameSettings) {
    let snapshot = settings.snapshot();
    println!(
        "[{label}] volume: {}, brightness: {}, difficulty: {}",
        snapshot.volume, snapshot.brightness, snapshot.difficulty
    );
}

pub fn main() {
    /* Two plain records don't share anything */
    let menu = GameSettings::new();
    menu.set_volume(80);
    let gameplay = GameSettings::new();
    print("plain menu", &menu);
    print("plain gameplay", &gameplay);

    let settings = SETTINGS.get_instance();
    print("default", settings);

    settings.set_volume(80);
    settings.set_brightness(90);
    settings.set_difficulty(Difficulty::Hard);
    print("updated", settings);

    let workers = (0..4).map(|n| {
        thread::spawn(move || {
            let settings = SETTINGS.get_instance();
            print(&format!("thread {n}"), settings);
            settings as *const GameSettings as usize
        })
    }).collect::<Vec<_>>();

    for w in workers {
        let addr = w.join().unwrap();
        println!("same instance? {}", addr == settings as *const GameSettings as usize);
    }
}
