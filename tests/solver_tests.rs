use spotter::data::roster::Crew;
use spotter::solver::{
    apply_combo, apply_partial, apply_single_trait, apply_solve, compute_rarities, derive,
    filter_alpha_exceptions, filter_groups, get_optimal_combos, match_crew, FinderPrefs,
    HeuristicMode, Node, NodeState, Puzzle, PuzzleTrait, SingleTraitOutcome, SolveSlot,
    SolverError, Spotter, UsableFilter,
};

fn puzzle(nodes: Vec<Node>, pool: &[&str]) -> Puzzle {
    Puzzle {
        id: "test-chain".to_string(),
        nodes,
        traits: pool.iter().map(|t| PuzzleTrait::new(t)).collect(),
    }
}

fn owned(symbol: &str, traits: &[&str]) -> Crew {
    let mut crew = Crew::new(symbol, symbol.to_uppercase(), traits);
    crew.owned = true;
    crew
}

fn solved_progress(node: &Node, initial_hidden: usize) -> bool {
    let filled = node.solve.len() - node.solve.iter().filter(|s| s.is_unknown()).count();
    filled == initial_hidden - node.hidden_left()
}

#[test]
fn rarity_counts_crew_per_trait() {
    let puzzle = puzzle(vec![Node::new(0, &[], 1, "")], &["x", "y", "z"]);
    let roster = vec![
        Crew::new("A", "A", &["x", "y"]),
        Crew::new("B", "B", &["x"]),
        Crew::new("C", "C", &["y", "z"]),
    ];
    let matching = match_crew(&puzzle, &roster, &[]);
    let table = compute_rarities(&puzzle.nodes[0], &matching).unwrap();

    assert_eq!(table.traits["x"], vec!["A", "B"]);
    assert_eq!(table.traits["y"], vec!["A", "C"]);
    assert_eq!(table.traits["z"], vec!["C"]);
    assert_eq!(table.trait_rarity("z"), 1);
    let rarest = table
        .traits
        .iter()
        .min_by_key(|(_, crew)| crew.len())
        .map(|(t, _)| t.as_str());
    assert_eq!(rarest, Some("z"));
}

#[test]
fn rarity_is_pure() {
    let puzzle = puzzle(vec![Node::new(0, &["human"], 2, "")], &["pilot", "spy", "medic"]);
    let roster = vec![
        Crew::new("a", "A", &["human", "pilot", "spy"]),
        Crew::new("b", "B", &["human", "pilot", "medic", "spy"]),
    ];
    let matching = match_crew(&puzzle, &roster, &[]);
    let first = compute_rarities(&puzzle.nodes[0], &matching).unwrap();
    let second = compute_rarities(&puzzle.nodes[0], &matching).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.combo_rarity(&["pilot".to_string(), "spy".to_string()]),
        2
    );
}

#[test]
fn rarity_keeps_combos_nobody_matches() {
    let puzzle = puzzle(vec![Node::new(0, &[], 1, "")], &["x", "y"]);
    let roster = vec![Crew::new("a", "A", &["x"])];
    let matching = match_crew(&puzzle, &roster, &[]);
    let (node, pool) = (&puzzle.nodes[0], vec!["x".to_string(), "y".to_string()]);
    let table = spotter::solver::compute_rarities_over(node, &matching, &pool).unwrap();
    assert_eq!(table.combo_rarity(&["y".to_string()]), 0);
    assert!(table.combo(&["y".to_string()]).is_some());
}

#[test]
fn rarity_rejects_solved_node() {
    let node = Node::new(4, &[], 1, "");
    let node = apply_combo(&node, &["x".to_string()]).unwrap();
    assert_eq!(
        compute_rarities(&node, &[]),
        Err(SolverError::NodeAlreadySolved(4))
    );
}

#[test]
fn partial_then_single_trait_solves_node() {
    let node = Node::new(0, &[], 2, "");
    assert!(solved_progress(&node, 2));

    let partial = apply_partial(&node, "x").unwrap();
    assert_eq!(partial.solve, vec![SolveSlot::known("x"), SolveSlot::Unknown]);
    assert_eq!(partial.hidden_left(), 1);
    assert_eq!(partial.state(), NodeState::PartiallySolved);
    assert!(solved_progress(&partial, 2));

    let SingleTraitOutcome::Solved(solved) = apply_single_trait(&partial, "y").unwrap() else {
        panic!("one hidden slot should solve directly");
    };
    assert_eq!(solved.solve, vec![SolveSlot::known("x"), SolveSlot::known("y")]);
    assert_eq!(solved.state(), NodeState::Solved);
    assert!(solved_progress(&solved, 2));
}

#[test]
fn combo_of_wrong_length_fails_and_leaves_node_unchanged() {
    let node = Node::new(2, &["human"], 1, "m");
    let before = node.clone();
    let err = apply_combo(&node, &["x".to_string(), "y".to_string()]).unwrap_err();
    assert_eq!(
        err,
        SolverError::InvalidComboLength {
            node: 2,
            expected: 1,
            actual: 2
        }
    );
    assert_eq!(node, before);
    assert_eq!(node.state(), NodeState::Unsolved);
}

#[test]
fn combo_of_right_length_resolves_node() {
    let node = Node::new(0, &[], 2, "");
    let solved = apply_combo(&node, &["b".to_string(), "a".to_string()]).unwrap();
    assert_eq!(solved.state(), NodeState::Solved);
    assert_eq!(solved.solve, vec![SolveSlot::known("b"), SolveSlot::known("a")]);
}

#[test]
fn apply_solve_accepts_placeholders() {
    let node = Node::new(0, &[], 2, "");
    let partial = apply_solve(&node, &[SolveSlot::known("x"), SolveSlot::Unknown]).unwrap();
    assert_eq!(partial.state(), NodeState::PartiallySolved);
    assert!(matches!(
        apply_solve(&partial, &[SolveSlot::known("y"), SolveSlot::known("z")]),
        Err(SolverError::InvalidComboLength { expected: 1, actual: 2, .. })
    ));
}

#[test]
fn unknown_node_index_is_reported() {
    let puzzle = puzzle(vec![Node::new(0, &[], 1, "")], &["x"]);
    assert_eq!(puzzle.node(9).unwrap_err(), SolverError::UnknownNodeIndex(9));
}

#[test]
fn mark_attempted_is_idempotent() {
    let once = Spotter::new("chain").mark_attempted("kirk");
    let twice = once.mark_attempted("kirk");
    assert_eq!(once, twice);
    assert_eq!(twice.attempted_crew, vec!["kirk"]);
}

fn alpha_puzzle() -> (Puzzle, Vec<Crew>) {
    let puzzle = puzzle(vec![Node::new(0, &[], 1, "m")], &["a", "z"]);
    let roster = vec![owned("p", &["a"]), owned("q", &["z"]), owned("r", &["a", "z"])];
    (puzzle, roster)
}

#[test]
fn alpha_hide_excludes_early_traits() {
    let (puzzle, roster) = alpha_puzzle();
    let prefs = FinderPrefs {
        alpha: HeuristicMode::Hide,
        nonoptimal: HeuristicMode::Flag,
        ..FinderPrefs::default()
    };
    let report = derive(&puzzle, &roster, &Spotter::new("test-chain"), &prefs).unwrap();
    let groups = &report.node(0).unwrap().groups;

    assert!(groups
        .groups
        .iter()
        .all(|group| !group.traits.contains(&"a".to_string())));
    assert!(groups
        .groups
        .iter()
        .any(|group| group.traits == vec!["z".to_string()]));
    assert!(report.filters_may_hide_solutions);
}

#[test]
fn alpha_hide_drops_early_traits_from_rarities() {
    let (puzzle, roster) = alpha_puzzle();
    let hide = FinderPrefs {
        alpha: HeuristicMode::Hide,
        ..FinderPrefs::default()
    };
    let report = derive(&puzzle, &roster, &Spotter::new("test-chain"), &hide).unwrap();
    let node = report.node(0).unwrap();
    assert!(!node.rarities.traits.contains_key("a"));
    assert_eq!(node.rarities.trait_rarity("z"), 2);
    assert!(node.rarities.combos.iter().all(|entry| !entry.combo.contains(&"a".to_string())));
    assert_eq!(node.possible_traits, vec!["z"]);

    let flag = FinderPrefs {
        alpha: HeuristicMode::Flag,
        ..FinderPrefs::default()
    };
    let report = derive(&puzzle, &roster, &Spotter::new("test-chain"), &flag).unwrap();
    assert!(report.node(0).unwrap().rarities.traits.contains_key("a"));
}

#[test]
fn alpha_flag_keeps_and_marks_early_traits() {
    let (puzzle, roster) = alpha_puzzle();
    let prefs = FinderPrefs {
        alpha: HeuristicMode::Flag,
        nonoptimal: HeuristicMode::Flag,
        ..FinderPrefs::default()
    };
    let report = derive(&puzzle, &roster, &Spotter::new("test-chain"), &prefs).unwrap();
    let groups = &report.node(0).unwrap().groups.groups;

    let flagged: Vec<_> = groups
        .iter()
        .filter(|group| group.notes.alpha_exception)
        .map(|group| group.traits.clone())
        .collect();
    assert!(flagged.contains(&vec!["a".to_string()]));
    let z_only = groups
        .iter()
        .find(|group| group.traits == vec!["z".to_string()])
        .unwrap();
    assert!(!z_only.notes.alpha_exception);
}

#[test]
fn nonoptimal_hide_keeps_only_widest_trait_sets() {
    let (puzzle, roster) = alpha_puzzle();
    let matching = match_crew(&puzzle, &roster, &[]);
    let optimal = get_optimal_combos(&matching);
    let node = &puzzle.nodes[0];
    let rarities = compute_rarities(node, &matching).unwrap();

    let groups = filter_groups(node, &matching, &rarities, &optimal, &FinderPrefs::default()).unwrap();
    assert_eq!(groups.groups.len(), 1);
    assert_eq!(groups.groups[0].traits, vec!["a", "z"]);
    assert_eq!(groups.groups[0].crew, vec!["r"]);
    assert!(groups.groups[0].notes.unique);
}

#[test]
fn filter_groups_alpha_hide_keeps_late_trait_of_widest_crew() {
    let puzzle = puzzle(vec![Node::new(0, &[], 1, "m")], &["a", "z"]);
    let roster = vec![owned("r", &["a", "z"]), owned("q", &["z"])];
    let matching = match_crew(&puzzle, &roster, &[]);
    let optimal = get_optimal_combos(&matching);
    let node = &puzzle.nodes[0];
    let rarities = compute_rarities(node, &matching).unwrap();
    let prefs = FinderPrefs {
        alpha: HeuristicMode::Hide,
        ..FinderPrefs::default()
    };

    let groups = filter_groups(node, &matching, &rarities, &optimal, &prefs).unwrap();
    let z_only = groups
        .groups
        .iter()
        .find(|group| group.traits == vec!["z".to_string()])
        .expect("z group survives alpha hiding");
    assert!(z_only.crew.contains(&"r".to_string()));
    assert!(!z_only.notes.non_optimal);
    assert!(groups
        .groups
        .iter()
        .all(|group| !group.traits.contains(&"a".to_string())));
}

#[test]
fn filter_groups_is_pure_and_sorted_by_rarity() {
    let puzzle = puzzle(vec![Node::new(0, &[], 1, "")], &["x", "y"]);
    let roster = vec![owned("a", &["x"]), owned("b", &["x"]), owned("c", &["y"])];
    let matching = match_crew(&puzzle, &roster, &[]);
    let optimal = get_optimal_combos(&matching);
    let node = &puzzle.nodes[0];
    let rarities = compute_rarities(node, &matching).unwrap();
    let prefs = FinderPrefs::default();

    let first = filter_groups(node, &matching, &rarities, &optimal, &prefs).unwrap();
    let second = filter_groups(node, &matching, &rarities, &optimal, &prefs).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.groups[0].traits, vec!["y"]);
    assert_eq!(first.groups[0].rarity, 1);
    assert_eq!(first.groups[1].crew, vec!["a", "b"]);
}

#[test]
fn usable_filter_hides_unowned_and_frozen_crew() {
    let puzzle = puzzle(vec![Node::new(0, &[], 1, "")], &["x", "y", "z"]);
    let mut frozen = owned("frozen", &["y"]);
    frozen.only_frozen = true;
    let roster = vec![owned("mine", &["x"]), frozen, Crew::new("theirs", "Theirs", &["z"])];
    let spotter = Spotter::new("test-chain");

    let owned_only = FinderPrefs {
        usable: UsableFilter::Owned,
        ..FinderPrefs::default()
    };
    let report = derive(&puzzle, &roster, &spotter, &owned_only).unwrap();
    let crew: Vec<_> = report.nodes[0]
        .groups
        .groups
        .iter()
        .flat_map(|group| group.crew.clone())
        .collect();
    assert_eq!(crew, vec!["mine", "frozen"]);

    let thawed = FinderPrefs {
        usable: UsableFilter::Thawed,
        ..FinderPrefs::default()
    };
    let report = derive(&puzzle, &roster, &spotter, &thawed).unwrap();
    assert_eq!(report.nodes[0].groups.crew_count(), 1);
}

#[test]
fn attempted_crew_rule_out_their_combos() {
    let (puzzle, roster) = alpha_puzzle();
    let spotter = Spotter::new("test-chain").mark_attempted("r");
    let prefs = FinderPrefs {
        nonoptimal: HeuristicMode::Flag,
        ..FinderPrefs::default()
    };
    let report = derive(&puzzle, &roster, &spotter, &prefs).unwrap();

    assert!(report.matching_crew.is_empty());
    assert!(report.nodes[0].groups.is_empty());
}

#[test]
fn alpha_filter_drops_crew_with_nothing_left() {
    let (puzzle, roster) = alpha_puzzle();
    let matching = filter_alpha_exceptions(&match_crew(&puzzle, &roster, &[]));
    let symbols: Vec<_> = matching.iter().map(|crew| crew.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["q", "r"]);
}

#[test]
fn confirmed_traits_consume_pool_instances() {
    let mut solved = Node::new(1, &[], 1, "");
    solved.solve = vec![SolveSlot::known("x")];
    let puzzle = puzzle(vec![Node::new(0, &[], 1, ""), solved], &["x", "y"]);
    let roster = vec![owned("a", &["x", "y"])];

    let report = derive(&puzzle, &roster, &Spotter::new("test-chain"), &FinderPrefs::default()).unwrap();
    assert_eq!(report.nodes.len(), 1);
    assert_eq!(report.nodes[0].possible_traits, vec!["y"]);
}

#[test]
fn spotter_solves_are_replayed_before_derivation() {
    let puzzle = puzzle(vec![Node::new(0, &[], 2, ""), Node::new(1, &[], 1, "")], &["x", "y", "w"]);
    let roster = vec![owned("a", &["x", "y", "w"])];
    let node = apply_partial(&puzzle.nodes[0], "x").unwrap();
    let spotter = Spotter::new("test-chain").record_node(&node);

    let report = derive(&puzzle, &roster, &spotter, &FinderPrefs::default()).unwrap();
    let first = report.node(0).unwrap();
    assert_eq!(first.hidden_left, 1);
    assert_eq!(first.possible_traits, vec!["w", "y"]);
}
