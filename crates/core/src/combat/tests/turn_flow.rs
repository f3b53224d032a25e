//! Tests for turn order, round-end bookkeeping and terminal latching.

use super::support::*;

fn kill(encounter: &mut Encounter, slot: usize) {
    encounter.update_roster(|party| {
        if let Some(hero) = party.get_mut(slot) {
            hero.hp = 0;
        }
    });
}

#[test]
fn turn_order_is_fastest_first_and_skips_the_dead() {
    let mut encounter = encounter_with(plain_boss(), standard_party());
    kill(&mut encounter, 1);

    let order = encounter.compute_turn_order();
    assert!(order.iter().all(|combatant| combatant.alive));
    assert!(!order.iter().any(|combatant| combatant.id == CombatantId::Hero(1)));
    assert_eq!(order.len(), 4);
    assert!(order.windows(2).all(|pair| pair[0].speed >= pair[1].speed));
}

#[test]
fn a_downed_boss_is_left_out_of_the_order() {
    let mut encounter = encounter_with(plain_boss(), standard_party());
    encounter.set_boss_hp(0);
    let order = encounter.compute_turn_order();
    assert!(!order.iter().any(|combatant| combatant.id == CombatantId::Boss));
}

#[test]
fn hero_speed_includes_active_effects() {
    let mut encounter = encounter_with(plain_boss(), standard_party());
    encounter.push_effect(CombatantId::Hero(0), ActiveEffect::buff("haste", Stat::Speed, 50, 2));

    let order = encounter.compute_turn_order();
    assert_eq!(order[0].id, CombatantId::Hero(0));
    assert_eq!(order[0].speed, 58);
}

#[test]
fn combatant_falling_mid_round_keeps_its_slot_but_is_skipped() {
    let mut encounter = encounter_with(plain_boss(), standard_party());
    assert!(encounter.turn_order().iter().any(|c| c.id == CombatantId::Hero(0)));
    kill(&mut encounter, 0);

    while encounter.round() == 0 {
        match encounter.advance(8).stop_reason {
            AdvanceStopReason::AwaitingHeroTurn { slot, .. } => {
                assert_ne!(slot, 0, "a fallen hero never gets a turn");
                encounter.submit_hero_turn(slot, &[HeroAction::Defend]).expect("defend is valid");
            }
            AdvanceStopReason::BudgetExhausted => {}
            other => panic!("unexpected stop {other:?}"),
        }
    }

    assert!(encounter.log().contains(&CombatEvent::TurnSkipped { combatant: CombatantId::Hero(0) }));
    assert!(!encounter.turn_order().iter().any(|c| c.id == CombatantId::Hero(0)));
}

#[test]
fn speed_change_mid_round_waits_for_the_next_round() {
    let mut encounter = encounter_with(plain_boss(), standard_party());
    let frozen = encounter.turn_order().to_vec();
    let slowest = frozen
        .iter()
        .rev()
        .find_map(|combatant| match combatant.id {
            CombatantId::Hero(slot) => Some(slot),
            CombatantId::Boss => None,
        })
        .expect("some hero acts last");
    encounter.push_effect(CombatantId::Hero(slowest), ActiveEffect::buff("haste", Stat::Speed, 500, 5));
    assert_eq!(encounter.turn_order(), frozen.as_slice());

    let mut acted = Vec::new();
    loop {
        match encounter.advance(8).stop_reason {
            AdvanceStopReason::AwaitingHeroTurn { slot, round: 0 } => {
                assert_eq!(encounter.turn_order(), frozen.as_slice());
                acted.push(CombatantId::Hero(slot));
                encounter.submit_hero_turn(slot, &[HeroAction::Defend]).expect("defend is valid");
            }
            AdvanceStopReason::AwaitingHeroTurn { .. } => break,
            AdvanceStopReason::BudgetExhausted => {}
            other => panic!("unexpected stop {other:?}"),
        }
    }

    let planned: Vec<_> = frozen
        .iter()
        .map(|combatant| combatant.id)
        .filter(|id| matches!(id, CombatantId::Hero(_)))
        .collect();
    assert_eq!(acted, planned);
    assert_eq!(encounter.turn_order()[0].id, CombatantId::Hero(slowest));
}

#[test]
fn pending_hero_who_falls_loses_the_turn() {
    let mut encounter = encounter_with(plain_boss(), standard_party());
    let slot = await_hero(&mut encounter);
    kill(&mut encounter, slot);
    let boss_hp = encounter.boss().hp();

    let rejection = encounter
        .submit_hero_turn(slot, &[HeroAction::Attack])
        .expect_err("a fallen hero cannot act");
    assert_eq!(rejection.kind, RejectionKind::HeroFallen);
    assert_eq!(encounter.boss().hp(), boss_hp);

    match encounter.advance(64).stop_reason {
        AdvanceStopReason::AwaitingHeroTurn { slot: next, .. } => assert_ne!(next, slot),
        AdvanceStopReason::Finished(_) | AdvanceStopReason::BudgetExhausted => {}
        other => panic!("unexpected stop {other:?}"),
    }
    assert!(encounter.log().contains(&CombatEvent::TurnSkipped { combatant: CombatantId::Hero(slot) }));
}

#[test]
fn pending_hero_removed_from_the_roster_does_not_stall_the_fight() {
    let mut encounter = encounter_with(plain_boss(), standard_party());
    let slot = await_hero(&mut encounter);
    encounter.update_roster(|party| party.set(slot, None));

    match encounter.advance(64).stop_reason {
        AdvanceStopReason::AwaitingHeroTurn { slot: next, .. } => {
            assert_ne!(next, slot);
            encounter.submit_hero_turn(next, &[HeroAction::Defend]).expect("next hero can act");
        }
        AdvanceStopReason::Finished(_) | AdvanceStopReason::BudgetExhausted => {}
        other => panic!("unexpected stop {other:?}"),
    }
    assert!(encounter.log().contains(&CombatEvent::TurnSkipped { combatant: CombatantId::Hero(slot) }));
}

#[test]
fn round_end_decrements_cooldowns_and_effects_once() {
    let mut encounter = encounter_with(plain_boss(), standard_party());
    encounter.cooldowns.start(CombatantId::Hero(0), "smite", 3);
    encounter.push_effect(CombatantId::Boss, ActiveEffect::debuff("sunder", Stat::Defense, 4, 1));
    encounter.push_effect(
        CombatantId::Hero(2),
        ActiveEffect::buff("blessing", Stat::Luck, 4, 1).permanent(),
    );

    encounter.end_round();
    encounter.end_round();

    assert_eq!(encounter.round(), 2);
    assert_eq!(encounter.cooldowns().remaining(CombatantId::Hero(0), "smite"), 1);
    assert!(encounter.boss().effects().is_empty());
    assert!(encounter.log().contains(&CombatEvent::EffectExpired {
        target: CombatantId::Boss,
        effect: "sunder".to_string(),
    }));
    let priest = encounter.party().get(2).expect("priest");
    assert_eq!(priest.effects.len(), 1, "permanent effects never expire");
}

#[test]
fn status_ticks_deal_true_damage_before_expiring() {
    let mut encounter = encounter_with(plain_boss(), standard_party());
    encounter.push_effect(
        CombatantId::Hero(0),
        ActiveEffect::status("poison", StatusTick::DamageOverTime(7), 2),
    );
    encounter.push_effect(
        CombatantId::Boss,
        ActiveEffect::status("regrowth", StatusTick::HealOverTime(5), 1),
    );
    encounter.set_boss_hp(100);

    encounter.end_round();
    encounter.end_round();
    encounter.end_round();

    assert_eq!(encounter.party().get(0).expect("knight").hp, 120 - 14);
    assert_eq!(encounter.boss().hp(), 105);
    let poison_ticks = encounter
        .log()
        .iter()
        .filter(|event| matches!(event, CombatEvent::StatusTick { amount: -7, .. }))
        .count();
    assert_eq!(poison_ticks, 2);
}

#[test]
fn poison_can_finish_off_a_hero() {
    let mut encounter = encounter_with(plain_boss(), standard_party());
    encounter.update_roster(|party| {
        if let Some(hero) = party.get_mut(3) {
            hero.hp = 3;
        }
    });
    encounter.push_effect(
        CombatantId::Hero(3),
        ActiveEffect::status("poison", StatusTick::DamageOverTime(7), 2),
    );

    encounter.end_round();

    let minstrel = encounter.party().get(3).expect("minstrel");
    assert_eq!(minstrel.hp, 0);
    assert!(!minstrel.alive);
    assert!(encounter.log().contains(&CombatEvent::StatusTick {
        target: CombatantId::Hero(3),
        effect: "poison".to_string(),
        amount: -3,
    }));
}

#[test]
fn max_hp_never_moves_during_a_full_fight() {
    let mut encounter = encounter_with(plain_boss(), standard_party());
    let max_hp = encounter.boss().max_hp();

    for _ in 0..400 {
        match encounter.advance(16).stop_reason {
            AdvanceStopReason::Finished(_) => break,
            AdvanceStopReason::AwaitingHeroTurn { slot, .. } => {
                let actions = suggest_turn(&encounter, slot);
                encounter.submit_hero_turn(slot, &actions).expect("autopilot turn is valid");
            }
            AdvanceStopReason::BudgetExhausted => {}
            AdvanceStopReason::EngineFailure(reason) => panic!("engine failure {reason:?}"),
        }
        assert_eq!(encounter.boss().max_hp(), max_hp);
        assert!((0..=max_hp).contains(&encounter.boss().hp()));
        for (_, hero) in encounter.party().iter() {
            assert!((0..=hero.max_hp).contains(&hero.hp));
        }
    }
    assert!(encounter.finished_outcome().is_some(), "fight should end");
}

#[test]
fn terminal_check_latches_once() {
    let mut encounter = encounter_with(plain_boss(), standard_party());
    encounter.set_boss_hp(0);

    assert_eq!(encounter.check_terminal(), Some(RunOutcome::Victory));
    assert_eq!(encounter.check_terminal(), Some(RunOutcome::Victory));
    let finished = encounter
        .log()
        .iter()
        .filter(|event| matches!(event, CombatEvent::Finished { .. }))
        .count();
    assert_eq!(finished, 1);
    assert_eq!(
        encounter.advance(10).stop_reason,
        AdvanceStopReason::Finished(RunOutcome::Victory)
    );
}

#[test]
fn victory_wins_over_a_simultaneous_wipe() {
    let mut encounter = encounter_with(plain_boss(), standard_party());
    for slot in 0..PARTY_SIZE {
        kill(&mut encounter, slot);
    }
    encounter.set_boss_hp(0);
    assert_eq!(encounter.check_terminal(), Some(RunOutcome::Victory));
}

#[test]
fn an_empty_roster_is_an_immediate_defeat() {
    let mut encounter = encounter_with(plain_boss(), Party::new());
    let result = encounter.advance(10);
    assert_eq!(result.simulated_turns, 0);
    assert_eq!(result.stop_reason, AdvanceStopReason::Finished(RunOutcome::Defeat));
}

#[test]
fn pending_hero_turn_is_reported_until_answered() {
    let mut encounter = encounter_with(plain_boss(), standard_party());
    let slot = await_hero(&mut encounter);
    let again = encounter.advance(10);
    assert_eq!(again.simulated_turns, 0);
    assert_eq!(
        again.stop_reason,
        AdvanceStopReason::AwaitingHeroTurn { slot, round: encounter.round() }
    );
}

#[test]
fn boss_stats_rescale_with_each_round() {
    let mut encounter = encounter_with(plain_boss(), standard_party());
    let opening = encounter.boss().stats().attack;
    for _ in 0..20 {
        encounter.end_round();
    }
    assert!(encounter.boss().stats().attack > opening);
    assert_eq!(encounter.boss().stats().hp, encounter.boss().max_hp());
}
