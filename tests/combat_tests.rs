use mechcurve::combat::{
    best_mode_damage, build_profile, build_profiles, estimate_damage_curve, hit_chance,
    run_engagement, select_damage, select_weapons, EngagementConfig, FiringMode, FiringSituation,
    HeatSinkTech, TraceMode, UnitLoadout, WeaponCategory, WeaponRecord,
};

fn approx_eq(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "expected {b}, got {a}");
}

fn situation(distance: u32, base_target: i32, heat_budget: u32) -> FiringSituation {
    FiringSituation {
        distance,
        base_target,
        heat_budget,
        target_movement_bonus: 0,
    }
}

fn medium_laser() -> WeaponRecord {
    WeaponRecord {
        expected_damage: 5.0,
        heat: 3,
        short_range: Some(3),
        medium_range: Some(6),
        long_range: Some(9),
        ..WeaponRecord::new("Medium Laser", WeaponCategory::Energy)
    }
}

fn lrm_20() -> WeaponRecord {
    WeaponRecord {
        expected_damage: 11.6,
        heat: 6,
        min_range: Some(6),
        short_range: Some(7),
        medium_range: Some(14),
        long_range: Some(21),
        ..WeaponRecord::new("LRM 20", WeaponCategory::Missile)
    }
}

fn arrow_iv() -> WeaponRecord {
    WeaponRecord {
        heat: 10,
        min_range: Some(6),
        short_range: Some(6),
        medium_range: Some(12),
        long_range: Some(17),
        rack_size: Some(20),
        ..WeaponRecord::new("Arrow IV", WeaponCategory::Artillery)
    }
}

fn mml_5() -> WeaponRecord {
    WeaponRecord {
        expected_damage: 2.9,
        heat: 3,
        short_range: Some(7),
        medium_range: Some(14),
        long_range: Some(21),
        rack_size: Some(5),
        ..WeaponRecord::new("MML 5", WeaponCategory::Missile)
    }
}

#[test]
fn hit_chance_is_monotone_and_clamped_at_the_edges() {
    assert_eq!(hit_chance(-3), 1.0);
    assert_eq!(hit_chance(2), 1.0);
    approx_eq(hit_chance(12), 1.0 / 36.0, 1e-12);
    assert_eq!(hit_chance(13), 0.0);
    assert_eq!(hit_chance(40), 0.0);

    let mut previous = hit_chance(-5);
    for target in -4..=20 {
        let p = hit_chance(target);
        assert!((0.0..=1.0).contains(&p), "target {target} gave {p}");
        assert!(p <= previous, "hit chance rose at target {target}");
        previous = p;
    }
}

#[test]
fn empty_loadout_produces_twelve_zero_turns() {
    let unit = UnitLoadout {
        walk_mp: 4,
        heat_sink_count: 10,
        ..UnitLoadout::default()
    };
    let curve = estimate_damage_curve(&unit);
    assert_eq!(curve.turns(), &[0.0; 12]);
}

#[test]
fn zero_heat_weapon_never_lowers_selected_damage() {
    let base = build_profiles(&[medium_laser(), lrm_20(), medium_laser()], false);
    let mut extended = base.clone();
    extended.push(build_profile(
        &WeaponRecord {
            heat: 0,
            expected_damage: 2.0,
            ..WeaponRecord::new("Machine Gun", WeaponCategory::Ballistic)
        },
        false,
    ));

    for distance in 1..=25 {
        for heat_budget in [0, 3, 6, 9, 20] {
            let situation = situation(distance, 5, heat_budget);
            let before = select_damage(&base, &situation);
            let after = select_damage(&extended, &situation);
            assert!(
                after >= before,
                "distance {distance} budget {heat_budget}: {after} < {before}"
            );
        }
    }
}

#[test]
fn artillery_is_locked_out_inside_minimum_range() {
    let profile = build_profile(&arrow_iv(), false);
    for distance in 1..=6 {
        assert_eq!(best_mode_damage(&profile, &situation(distance, 5, 30)), 0.0);
    }
    assert!(best_mode_damage(&profile, &situation(7, 5, 30)) > 0.0);
    assert_eq!(best_mode_damage(&profile, &situation(18, 5, 30)), 0.0);
}

#[test]
fn direct_fire_inside_minimum_range_is_penalized_but_positive() {
    let profile = build_profile(&lrm_20(), false);
    let at_short = best_mode_damage(&profile, &situation(7, 4, 30));
    let at_min = best_mode_damage(&profile, &situation(6, 4, 30));
    let point_blank = best_mode_damage(&profile, &situation(4, 4, 30));

    // 4 + 0 band + 1 penalty = 5, then 4 + 0 + 3 = 7
    approx_eq(at_min, 11.6 * hit_chance(5), 1e-12);
    approx_eq(point_blank, 11.6 * hit_chance(7), 1e-12);
    assert!(point_blank > 0.0);
    assert!(point_blank < at_min && at_min <= at_short);
}

#[test]
fn dual_mode_rack_never_does_worse_than_its_base_mode_up_close() {
    let dual = build_profile(&mml_5().with_inferred_dual_mode(), false);
    assert!(matches!(dual.mode, FiringMode::DualModeMissile { .. }));
    let base_only = build_profile(
        &WeaponRecord {
            dual_mode: Some(false),
            ..mml_5()
        },
        false,
    );
    assert!(matches!(base_only.mode, FiringMode::Standard));

    for distance in 1..=3 {
        for base_target in 3..=9 {
            let situation = situation(distance, base_target, 10);
            let with_alternate = best_mode_damage(&dual, &situation);
            let base = best_mode_damage(&base_only, &situation);
            assert!(with_alternate >= base);
        }
    }
    // 5 tubes * 2 * 0.58 at target 4
    approx_eq(
        best_mode_damage(&dual, &situation(2, 4, 10)),
        5.8 * hit_chance(4),
        1e-12,
    );
}

#[test]
fn dual_mode_flag_is_structured_not_name_driven() {
    let renamed = WeaponRecord {
        name: "Multi-Missile Launcher 5".to_string(),
        dual_mode: Some(true),
        ..mml_5()
    };
    assert!(matches!(
        build_profile(&renamed, false).mode,
        FiringMode::DualModeMissile { .. }
    ));

    let no_rack = WeaponRecord {
        rack_size: None,
        ..mml_5()
    };
    assert!(matches!(build_profile(&no_rack, false).mode, FiringMode::Standard));
}

#[test]
fn single_zero_heat_weapon_fires_only_once_within_long_range() {
    let unit = UnitLoadout {
        walk_mp: 4,
        weapons: vec![WeaponRecord {
            heat: 0,
            ..medium_laser()
        }],
        ..UnitLoadout::default()
    };
    let result = run_engagement(&unit, &EngagementConfig::default(), TraceMode::Turns);
    assert_eq!(result.curve.len(), 12);

    let mut fired = 0;
    for (turn, value) in result.trace.iter().zip(result.curve.turns()) {
        if turn.distance > 9 {
            assert_eq!(*value, 0.0, "turn {} at distance {}", turn.turn, turn.distance);
        } else {
            assert!(*value > 0.0, "turn {} at distance {}", turn.turn, turn.distance);
            fired += 1;
        }
    }
    assert!(fired > 0);
    assert_eq!(&result.curve.turns()[..3], &[0.0, 0.0, 0.0]);
    // Turn 4: opponent closes to 18, subject advances to 16.
    assert_eq!(result.trace[3].distance, 2);
    assert_eq!(result.curve.turns()[3], 3.9);
}

#[test]
fn unaffordable_weapon_is_never_fired() {
    let unit = UnitLoadout {
        walk_mp: 4,
        heat_sink_count: 10,
        heat_sink_tech: HeatSinkTech::Single,
        weapons: vec![WeaponRecord {
            expected_damage: 15.0,
            heat: 15,
            ..WeaponRecord::new("Heavy PPC", WeaponCategory::Energy)
        }],
        ..UnitLoadout::default()
    };
    assert_eq!(estimate_damage_curve(&unit).turns(), &[0.0; 12]);
}

#[test]
fn artillery_boundary_is_strict_at_minimum_range() {
    let profile = build_profile(&arrow_iv(), false);
    assert_eq!(best_mode_damage(&profile, &situation(6, 5, 30)), 0.0);
    assert!(best_mode_damage(&profile, &situation(7, 5, 30)) > 0.0);
}

#[test]
fn artillery_stack_is_worth_its_single_launchers() {
    let single = build_profile(&arrow_iv(), false);
    let pair = build_profile(
        &WeaponRecord {
            quantity: 2,
            ..arrow_iv()
        },
        false,
    );
    // Target 8 misses often enough for the scatter term to matter.
    let sit = situation(8, 8, 30);
    let one = best_mode_damage(&single, &sit);
    let expected = 20.0 * hit_chance(8) + (10.0 / 6.0) * (1.0 - hit_chance(8));
    approx_eq(one, expected, 1e-12);
    approx_eq(best_mode_damage(&pair, &sit), 2.0 * one, 1e-12);

    let loadout = |weapons: Vec<WeaponRecord>| UnitLoadout {
        walk_mp: 4,
        heat_sink_count: 30,
        heat_sink_tech: HeatSinkTech::Single,
        weapons,
        ..UnitLoadout::default()
    };
    let stacked = loadout(vec![WeaponRecord {
        quantity: 2,
        ..arrow_iv()
    }]);
    let separate = loadout(vec![arrow_iv(), arrow_iv()]);
    let config = EngagementConfig {
        gunnery: 7,
        ..EngagementConfig::default()
    };
    let stacked = run_engagement(&stacked, &config, TraceMode::Off);
    let separate = run_engagement(&separate, &config, TraceMode::Off);
    approx_eq(stacked.raw_total, separate.raw_total, 1e-9);
    assert!(stacked.raw_total > 0.0);
}

#[test]
fn artillery_ignores_target_movement_bonus() {
    // Pinned: the movement bonus folded into the shared base target is
    // subtracted again for artillery, so a moving target is no harder to hit.
    let artillery = build_profile(&arrow_iv(), false);
    let laser = build_profile(&medium_laser(), false);
    let still = FiringSituation {
        distance: 8,
        base_target: 5,
        heat_budget: 30,
        target_movement_bonus: 0,
    };
    let moving = FiringSituation {
        base_target: 6,
        target_movement_bonus: 1,
        ..still
    };

    approx_eq(
        best_mode_damage(&artillery, &still),
        best_mode_damage(&artillery, &moving),
        1e-12,
    );
    let expected = 20.0 * hit_chance(5) + (10.0 / 6.0) * (1.0 - hit_chance(5));
    approx_eq(best_mode_damage(&artillery, &moving), expected, 1e-12);

    assert!(best_mode_damage(&laser, &moving) < best_mode_damage(&laser, &still));
}

#[test]
fn greedy_selection_prefers_damage_per_heat_over_raw_damage() {
    // Budget 10: both lasers (5/3 per heat) go first and leave 4 heat, so the
    // PPC never fits.
    let profiles = build_profiles(
        &[
            WeaponRecord {
                expected_damage: 10.0,
                heat: 10,
                ..WeaponRecord::new("PPC", WeaponCategory::Energy)
            },
            medium_laser(),
            medium_laser(),
        ],
        false,
    );
    let chosen = select_weapons(&profiles, &situation(3, 2, 10));
    let indices: Vec<usize> = chosen.iter().map(|w| w.index).collect();
    assert_eq!(indices, vec![1, 2]);
    approx_eq(select_damage(&profiles, &situation(3, 2, 10)), 10.0, 1e-12);
}

#[test]
fn quantity_scales_damage_and_heat_once() {
    let profile = build_profile(
        &WeaponRecord {
            quantity: 4,
            ..medium_laser()
        },
        false,
    );
    assert_eq!(profile.base.expected_damage, 20.0);
    assert_eq!(profile.heat, 12);
}

#[test]
fn targeting_computer_only_helps_direct_fire() {
    assert_eq!(build_profile(&medium_laser(), true).to_hit_modifier, -1);
    assert_eq!(build_profile(&lrm_20(), true).to_hit_modifier, 0);
    assert_eq!(build_profile(&arrow_iv(), true).to_hit_modifier, 0);
}

#[test]
fn curve_values_are_rounded_to_one_decimal() {
    let unit = UnitLoadout {
        walk_mp: 5,
        heat_sink_count: 12,
        heat_sink_tech: HeatSinkTech::Double,
        weapons: vec![medium_laser(), lrm_20(), mml_5().with_inferred_dual_mode()],
        ..UnitLoadout::default()
    };
    for value in estimate_damage_curve(&unit).turns() {
        assert!(*value >= 0.0);
        approx_eq(*value * 10.0, (*value * 10.0).round(), 1e-9);
    }
}
