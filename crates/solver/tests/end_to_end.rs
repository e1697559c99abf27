use cdcl_core::{
    dimacs::parse_dimacs,
    engine::Engine,
    literal::{
        Sign,
        VariableTable,
    },
    search::{
        solve_cnf,
        SolveOptions,
        Status,
    },
    Clause,
};

fn solve(text: &str, heuristic: &str, seed: u64) -> cdcl_core::SolveResult {
    let (clauses, variables) = parse_dimacs(text);
    let options = SolveOptions {
        heuristic_name: heuristic.to_string(),
        seed,
        ..SolveOptions::default()
    };
    solve_cnf(clauses, variables, &options).expect("valid heuristic name")
}

#[test]
fn scenario_1_single_unit_clause_is_sat() {
    let result = solve("p cnf 1 1\n1 0\n", "vsids", 0);
    assert_eq!(result.status, Status::Sat);
    assert_eq!(result.assignment.get("1"), Some(&true));
}

#[test]
fn scenario_2_contradicting_units_is_unsat() {
    let result = solve("p cnf 1 2\n1 0\n-1 0\n", "vsids", 0);
    assert_eq!(result.status, Status::Unsat);
}

#[test]
fn scenario_3_two_clause_forces_one_variable() {
    let result = solve("p cnf 2 2\n1 2 0\n-1 2 0\n", "baseline", 3);
    assert_eq!(result.status, Status::Sat);
    assert_eq!(result.assignment.get("2"), Some(&true));
    // variable 1 may take either value; the only requirement is that it was decided.
    assert!(result.assignment.contains_key("1"));
}

#[test]
fn scenario_4_pigeonhole_three_into_two_is_unsat_with_learning() {
    // 3 pigeons, 2 holes: p_i_j means pigeon i sits in hole j.
    let mut text = String::from("p cnf 6 9\n");
    for i in 1..=3 {
        text.push_str(&format!("{} {} 0\n", 2 * i - 1, 2 * i));
    }
    for hole in 0..2 {
        for i in 1..=3 {
            for j in (i + 1)..=3 {
                text.push_str(&format!("-{} -{} 0\n", 2 * i - 1 + hole, 2 * j - 1 + hole));
            }
        }
    }
    for heuristic in ["baseline", "vsids"] {
        let result = solve(&text, heuristic, 42);
        assert_eq!(result.status, Status::Unsat);
        assert!(result.stats.learned_clauses >= 1);
        assert!(result.stats.conflicts >= 1);
    }
}

#[test]
fn scenario_5_hand_trace_backjumps_to_root_and_reaches_sat() {
    // c0={1} c1={-1,2} c2={-3,4} c3={-5,-6} c4={-1,-5,7} c5={-2,-5,6,-7}
    let mut table = VariableTable::new();
    let lit = |table: &mut VariableTable, name: &str, sign: Sign| {
        cdcl_core::Literal::new(table.intern(name), sign)
    };
    let v1 = lit(&mut table, "1", Sign::POS);
    let v2 = lit(&mut table, "2", Sign::POS);
    let v3 = lit(&mut table, "3", Sign::POS);
    let v4 = lit(&mut table, "4", Sign::POS);
    let v5 = lit(&mut table, "5", Sign::POS);
    let v6 = lit(&mut table, "6", Sign::POS);
    let v7 = lit(&mut table, "7", Sign::POS);
    let clauses = vec![
        Clause::new([v1]),
        Clause::new([v1.negate(), v2]),
        Clause::new([v3.negate(), v4]),
        Clause::new([v5.negate(), v6.negate()]),
        Clause::new([v1.negate(), v5.negate(), v7]),
        Clause::new([v2.negate(), v5.negate(), v6, v7.negate()]),
    ];

    let mut engine = Engine::new(clauses);
    assert!(engine.propagate(0)); // c0 unit: assigns 1 at level 0
    assert!(engine.decide(v3)); // level 1
    assert!(engine.propagate(2)); // c2 unit: assigns 4
    assert!(engine.decide(v5)); // level 2
    assert!(engine.propagate(4)); // c4 unit: assigns 7
    assert!(engine.propagate(1)); // c1 unit: assigns 2
    assert!(engine.propagate(5)); // c5 unit: assigns 6
    assert!(engine.conflict(3)); // c3 = {-5,-6} is now falsified

    assert!(engine.explain());
    assert_eq!(engine.asserting_level(), 0);
    assert!(engine.backjump(0));
    assert!(!engine.in_conflict());
    assert_eq!(engine.state().model().decision_level(), 0);
    assert!(engine.state().model().contains(v5.negate()));

    // Handing the same formula to the full search driver should now terminate SAT.
    let (clauses, variables) = parse_dimacs(
        "1 0\n-1 2 0\n-3 4 0\n-5 -6 0\n-1 -5 7 0\n-2 -5 6 -7 0\n",
    );
    let options = SolveOptions {
        heuristic_name: "vsids".to_string(),
        seed: 7,
        ..SolveOptions::default()
    };
    let result = solve_cnf(clauses, variables, &options).unwrap();
    assert_eq!(result.status, Status::Sat);
}

#[test]
fn scenario_6_empty_clause_database_is_trivially_sat() {
    let result = solve("", "vsids", 0);
    assert_eq!(result.status, Status::Sat);
    assert!(result.assignment.is_empty());
}
