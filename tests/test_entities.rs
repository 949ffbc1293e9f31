use webshooter::compute::init_state;
use webshooter::config::GameConfig;
use webshooter::entities::*;

#[test]
fn upgrade_ids_match_menu_keys() {
    for (i, upgrade) in Upgrade::ALL.iter().enumerate() {
        let id = i as u8 + 1;
        assert_eq!(upgrade.id(), id);
        assert_eq!(Upgrade::from_id(id), Some(*upgrade));
        assert!(upgrade.label().starts_with(&format!("{id}. ")));
    }
}

#[test]
fn out_of_range_upgrade_ids_are_unknown() {
    assert_eq!(Upgrade::from_id(0), None);
    assert_eq!(Upgrade::from_id(6), None);
    assert_eq!(Upgrade::from_id(255), None);
}

#[test]
fn full_upgrade_set_has_five_entries() {
    assert_eq!(Upgrade::full_set().len(), 5);
}

#[test]
fn inflate_grows_every_side() {
    let r = Rect::new(10.0, 20.0, 50.0, 50.0).inflate(5.0);
    assert_eq!(r, Rect::new(5.0, 15.0, 60.0, 60.0));
}

#[test]
fn entity_rects_follow_position_and_size() {
    let state = init_state(&GameConfig::default());
    let p = &state.player;
    assert_eq!(p.rect(), Rect::new(p.x, p.y, p.width, p.height));
}

#[test]
fn pause_remembers_suspended_phase() {
    assert_ne!(Mode::Paused(Phase::Playing), Mode::Paused(Phase::UpgradeSelect));
    assert_ne!(Mode::Playing, Mode::Paused(Phase::Playing));
}

#[test]
fn game_state_clone_is_independent() {
    let original = init_state(&GameConfig::default());
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.player.x = 99.0;
    cloned.score = 999;
    cloned.offerable.remove(&Upgrade::Shield);
    cloned.enemies.push(Enemy {
        x: 5.0,
        y: 5.0,
        speed: 1.0,
        width: 50.0,
        height: 50.0,
        color: RED,
    });

    assert_eq!(original.player.x, 375.0);
    assert_eq!(original.score, 0);
    assert!(original.offerable.contains(&Upgrade::Shield));
    assert!(original.enemies.is_empty());
}
