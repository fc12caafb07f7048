use bockstein::{
    bockstein_table::BocksteinTable, degree::Degree, BetaOperator, Coefficient, Context, Dataset,
    Error, LinComb, MapInverter, Operator, Table,
};
use expect_test::expect;
use rustc_hash::FxHashMap;

fn lc(s: &str) -> LinComb {
    s.parse().unwrap()
}

fn table(name: &str, entries: &[(&str, &str)]) -> Table {
    Table::from_entries(name, entries.iter().map(|&(k, v)| (k, lc(v))))
}

/// Bockstein names are lower case and algNSS names are upper case. `b` and `c` support
/// differentials hitting `3 y` and `9 y`, and `W` is at the boundary in the algNSS.
fn context() -> Context {
    let mut bockstein = BocksteinTable::new();
    bockstein.add_differential("a", "u");
    bockstein.add_differential("b", "y3");
    bockstein.add_differential("c", "y9");
    bockstein.add_bottom_cell("y");
    bockstein.add_bottom_cell("z");
    bockstein.add_bottom_cell("x");

    let mut beta = FxHashMap::default();
    beta.insert(
        BetaOperator::Beta2,
        table("beta2", &[("z", "a + b"), ("x", "c + 2 a"), ("u", "0")]),
    );

    Context::new(Dataset {
        bockstein,
        // Factors of 3 are restored in Bockstein names, so Y3 is the same in both tables
        boc_a0: table("boc_a0", &[("y", "y3 + junk"), ("y3", "y9"), ("Y", "Y3")]),
        a0: table("a0", &[("Y", "Y3"), ("U", "0")]),
        h0: table("h0", &[("Y", "U"), ("Z", "W + U")]),
        // W is at the boundary, so X is recovered from the last entry
        b2a: table(
            "b2a",
            &[("u", "U"), ("y", "Y"), ("z", "Z"), ("x", "X + W")],
        ),
        beta,
        degrees: [
            ("U", Degree::new(4, 1, 0)),
            ("Y", Degree::new(2, 1, 0)),
            ("Y3", Degree::new(2, 1, 1)),
            ("Z", Degree::new(3, 1, 0)),
            ("X", Degree::new(5, 1, 1)),
            ("W", Degree::new(5, 1, 2)),
        ]
        .into_iter()
        .collect(),
        ..Dataset::default()
    })
    .unwrap()
}

#[test]
fn inverse_resolves_in_table_order() {
    let t = table("f", &[("x", "p"), ("y", "p + q")]);
    let inv = MapInverter::new().invert(&t).unwrap();
    assert_eq!(inv.table.get("p"), Some(&lc("x")));
    assert_eq!(
        inv.table.get("q"),
        Some(&LinComb::from_terms([
            ("y", Coefficient::ONE),
            ("x", Coefficient::MINUS_ONE)
        ]))
    );
}

#[test]
fn context_tables() {
    let ctx = context();
    assert_eq!(ctx.max_total_degree(), Some(3));
    assert_eq!(ctx.b2a_inv().get("X"), Some(&lc("x")));
    // Y3 is divisible by 3 and W is at the boundary
    assert_eq!(ctx.b2a_inv().get("Y3"), Some(&LinComb::zero()));
    assert_eq!(ctx.b2a_inv().get("W"), Some(&LinComb::zero()));
    assert_eq!(ctx.boc_a0_div().get("y9"), Some(&lc("y3")));
    assert!(ctx.ambiguities().is_empty());
}

#[test]
fn delta() {
    let ctx = context();
    let delta = ctx.delta();
    assert!(delta.apply_to_generator("z").unwrap().is_zero());
    assert_eq!(delta.apply_to_generator("a").unwrap(), lc("U"));
    assert_eq!(delta.apply_to_generator("b").unwrap(), lc("Y"));
    assert_eq!(delta.apply_to_generator("c").unwrap(), lc("Y3"));
    assert_eq!(delta.apply_to_combination(&lc("a + 2 c")).unwrap(), lc("U + 2 Y3"));
    assert!(matches!(
        delta.apply_to_generator("Y"),
        Err(Error::NotAClass(_))
    ));
}

#[test]
fn beta_is_linear() {
    let ctx = context();
    let beta2 = ctx.beta(BetaOperator::Beta2).unwrap();

    let z = beta2.apply_to_generator("Z").unwrap();
    let x = beta2.apply_to_generator("X").unwrap();
    expect![[r#"U + Y"#]].assert_eq(&z.to_string());
    expect![[r#"2 U + Y3"#]].assert_eq(&x.to_string());

    let v = lc("2 Z + X");
    assert_eq!(
        beta2.apply_to_combination(&v).unwrap(),
        z.scalar(2).add(&x)
    );
    // Zero on classes that do not lift
    assert!(beta2.apply_to_generator("W").unwrap().is_zero());
}

#[test]
fn beta_iterate() {
    let ctx = context();
    let beta2 = ctx.beta("beta2".parse().unwrap()).unwrap();
    assert_eq!(beta2.iterate(&lc("Z"), 1).unwrap(), lc("U + Y"));
    // beta2 Y requires beta2 y, which is not in the table
    assert!(matches!(
        beta2.iterate(&lc("Z"), 2),
        Err(Error::Lookup(e)) if e.generator == "y" && e.table == "beta2"
    ));
}

#[test]
fn multiplication() {
    let ctx = context();
    assert_eq!(ctx.alpha1().apply_to_combination(&lc("Y + Z")).unwrap(), lc("2 U + W"));
    assert_eq!(ctx.three().apply_to_combination(&lc("Y + U")).unwrap(), lc("Y3"));
}

#[test]
fn unknown_coefficients_are_visible() {
    let mut bockstein = BocksteinTable::new();
    bockstein.add_differential("a", "p");
    let mut beta = FxHashMap::default();
    beta.insert(BetaOperator::Beta1, table("beta1", &[("p", "a")]));
    let ctx = Context::new(Dataset {
        bockstein,
        b2a: table("b2a", &[("p", "P + Q")]),
        beta,
        ..Dataset::default()
    })
    .unwrap();

    // P and Q are both new when p is processed
    assert_eq!(ctx.ambiguities().len(), 1);
    expect![[r#"b2a: stuck on p (unsolved: P, Q)"#]].assert_eq(&ctx.ambiguities()[0].to_string());
    assert!(!ctx.delta().apply_to_generator("a").unwrap().is_tainted());

    let v = ctx
        .beta(BetaOperator::Beta1)
        .unwrap()
        .apply_to_generator("P")
        .unwrap();
    assert!(v.is_tainted());
    expect![[r#"? P + ? Q"#]].assert_eq(&v.to_string());
}
