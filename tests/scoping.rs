use scopechain::{ScopeError, ScopeMap, ScopeSet};
use similar_asserts::assert_eq;

#[test]
fn shadowing() -> anyhow::Result<()> {
    let mut env = ScopeMap::new();
    env.declare("x", 0);
    env.push_scope();
    env.declare("x", 1);
    assert_eq!(env.get("x")?, &1);
    env.pop_scope()?;
    assert_eq!(env.get("x")?, &0);
    Ok(())
}

#[test]
fn outer_bindings_are_visible() -> anyhow::Result<()> {
    // let y = 2; fn me() { y }
    let mut env = ScopeMap::new();
    env.declare("y", 2);
    env.push_scope();
    assert_eq!(env.get("y")?, &2);
    assert!(env.has("y"));
    assert!(!env.has_local("y"));
    Ok(())
}

#[test]
fn assignment_is_not_declaration() -> anyhow::Result<()> {
    let mut env = ScopeMap::new();
    env.declare("x", 0);
    env.push_scope();
    env.set("x", 9)?;
    assert_eq!(env.get("x")?, &9);
    env.pop_scope()?;
    assert_eq!(env.get("x")?, &9);

    assert_eq!(env.set("undeclared", 1), Err(ScopeError::KeyNotFound));
    assert!(!env.has("undeclared"));
    Ok(())
}

#[test]
fn root_cannot_be_popped() {
    let mut env: ScopeMap<&str, i32> = ScopeMap::new();
    assert_eq!(env.pop_scope(), Err(ScopeError::ScopeUnderflow));
    assert_eq!(env.depth(), 1);

    let mut names: ScopeSet<&str> = ScopeSet::new();
    assert_eq!(names.pop_scope(), Err(ScopeError::ScopeUnderflow));
    assert_eq!(names.depth(), 1);
}

#[test]
fn delete_unshadows() -> anyhow::Result<()> {
    let mut env = ScopeMap::new();
    env.declare("x", 0);
    env.push_scope();
    env.declare("x", 1);
    assert_eq!(env.delete("x")?, 1);
    assert_eq!(env.get("x")?, &0);
    Ok(())
}

#[test]
fn set_variant_parity() -> anyhow::Result<()> {
    let mut names = ScopeSet::new();
    names.add("k");
    names.push_scope();
    assert!(names.has("k"));
    assert_eq!(names.delete_local("k"), Err(ScopeError::NotInCurrentScope));

    names.add("k");
    names.delete("k")?;
    assert!(names.has("k"));

    names.add("inner");
    names.pop_scope()?;
    assert!(names.has("k"));
    assert!(!names.has("inner"));
    Ok(())
}

#[test]
fn lookups_are_idempotent() {
    let mut env = ScopeMap::new();
    env.declare("a", 1);
    env.push_scope();
    env.declare("b", 2);

    for _ in 0..3 {
        assert_eq!(env.get("a"), Ok(&1));
        assert_eq!(env.get("b"), Ok(&2));
        assert_eq!(env.get("c"), Err(ScopeError::KeyNotFound));
        assert!(env.has("a"));
        assert!(!env.has("c"));
    }
}

#[test]
fn depth_accounting() {
    let mut env: ScopeMap<String, ()> = ScopeMap::new();
    let mut names: ScopeSet<String> = ScopeSet::new();
    for depth in 2..100 {
        env.push_scope();
        names.push_scope();
        assert_eq!(env.depth(), depth);
        assert_eq!(names.depth(), depth);
    }
    for depth in (1..99).rev() {
        assert!(env.pop_scope().is_ok());
        assert!(names.pop_scope().is_ok());
        assert_eq!(env.depth(), depth);
        assert_eq!(names.depth(), depth);
    }
    assert!(env.pop_scope().is_err());
    assert_eq!(env.depth(), 1);
}

#[test]
fn failed_operations_leave_chain_untouched() {
    let mut env = ScopeMap::new();
    env.declare("x", 0);
    env.push_scope();
    let before = env.clone();

    assert!(env.set("y", 1).is_err());
    assert!(env.delete("y").is_err());
    assert!(env.delete_local("x").is_err());
    assert!(env.declare_at(5, "y", 1).is_err());
    assert!(env == before);
}

#[test]
fn create_via_default() -> anyhow::Result<()> {
    let mut env: ScopeMap<&str, i32> = ScopeMap::default();
    assert_eq!(env.depth(), 1);
    env.declare("x", 1);
    assert_eq!(env.get("x")?, &1);
    assert_eq!(env.pop_scope(), Err(ScopeError::ScopeUnderflow));

    let mut names: ScopeSet<&str> = ScopeSet::default();
    assert_eq!(names.depth(), 1);
    names.add("x");
    assert!(names.has("x"));
    assert_eq!(names.get("x")?, &"x");
    Ok(())
}

#[test]
fn iter_hides_shadowed_keys() {
    let mut names = ScopeSet::new();
    names.add("k");
    names.add("outer");
    names.push_scope();
    names.add("k");

    let mut visible: Vec<_> = names.iter().copied().collect();
    visible.sort();
    assert_eq!(visible, vec!["k", "outer"]);
    assert_eq!(names.resolve("k"), Some(1));
    assert_eq!(names.resolve("outer"), Some(0));
}

