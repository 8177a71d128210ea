#[cfg(test)]
mod tests_impl {
    use crate::core::command::Command;
    use crate::core::documents::Snapshot;
    use crate::core::hooks::reconcile;
    use crate::core::model::{Chain, ChainIdentity, Expr, Rule, State};
    use crate::core::prune::{difference, prune, prune_stale};
    use crate::core::test_helpers::{chain, counter_jump_rule, hook, id, snapshot_json, state};
    use proptest::prelude::*;
    use serde_json::json;

    /// Applies "add rule" commands to a state the way the kernel would.
    fn apply_additions(state: &State, commands: &[Command]) -> State {
        let mut next = state.clone();
        let mut handle = 1000;
        for command in commands {
            if let Command::AddJumpRule {
                family,
                table,
                chain,
                target,
            } = command
            {
                handle += 1;
                next.rules.push(counter_jump_rule(family, table, chain, target, handle));
            }
        }
        next
    }

    #[test]
    fn test_hook_scenario_from_snapshot_document() {
        let snapshot = Snapshot::from_value(json!({
            "nftables": [
                { "metainfo": { "version": "1.0.9", "json_schema_version": 1 } },
                { "table": { "family": "ip", "name": "filter", "handle": 1 } },
                { "chain": { "family": "ip", "table": "filter", "name": "fwd", "handle": 2,
                             "type": "filter", "hook": "forward", "prio": 0, "policy": "accept" } },
                { "rule": { "family": "ip", "table": "filter", "chain": "fwd", "handle": 5,
                            "expr": [{ "counter": { "packets": 0, "bytes": 0 } },
                                     { "jump": { "target": "drop_bad" } }] } }
            ]
        }))
        .unwrap();

        assert!(reconcile(&snapshot.state, &[hook("ip", "filter", "fwd", "drop_bad")]).is_empty());

        let lines: Vec<_> = reconcile(&snapshot.state, &[hook("ip", "filter", "fwd", "other_target")])
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(lines, ["add rule ip filter fwd counter jump other_target"]);
    }

    #[test]
    fn test_prune_scenario_from_snapshot_document() {
        let snapshot = Snapshot::from_value(json!({
            "nftables": [
                { "chain": { "family": "ip", "table": "filter", "name": "fwd", "handle": 1 } },
                { "chain": { "family": "ip", "table": "filter", "name": "drop_bad", "handle": 7 } },
                { "rule": { "family": "ip", "table": "filter", "chain": "fwd", "handle": 3,
                            "expr": [{ "counter": null }, { "jump": { "target": "drop_bad" } }] } }
            ]
        }))
        .unwrap();

        let lines: Vec<_> = prune(&snapshot.state, &[id("ip", "filter", "drop_bad")])
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            lines,
            ["delete rule ip filter fwd handle 3", "delete chain ip filter handle 7"]
        );
    }

    #[test]
    fn test_hook_reconcile_idempotent() {
        let s = state(
            vec![chain("ip", "filter", "input", 1), chain("ip", "filter", "fwd", 2)],
            vec![counter_jump_rule("ip", "filter", "input", "a", 3)],
        );
        let hooks = [
            hook("ip", "filter", "input", "a"),
            hook("ip", "filter", "input", "b"),
            hook("ip", "filter", "fwd", "c"),
        ];

        let first = reconcile(&s, &hooks);
        assert_eq!(first.len(), 2);

        let applied = apply_additions(&s, &first);
        assert!(reconcile(&applied, &hooks).is_empty());
    }

    #[test]
    fn test_snapshot_json_helper_roundtrip() {
        let s = state(
            vec![chain("inet", "t", "c", 1)],
            vec![counter_jump_rule("inet", "t", "c", "x", 2)],
        );
        assert_eq!(Snapshot::from_value(snapshot_json(&s)).unwrap().state, s);
    }

    // Small name pools so generated targets collide with live chains often
    fn arb_identity() -> impl Strategy<Value = ChainIdentity> {
        (
            prop::sample::select(vec!["ip", "ip6"]),
            prop::sample::select(vec!["filter", "nat"]),
            prop::sample::select(vec!["a", "b", "c", "d"]),
        )
            .prop_map(|(f, t, n)| ChainIdentity::new(f, t, n))
    }

    fn arb_rule() -> impl Strategy<Value = Rule> {
        (
            arb_identity(),
            prop::option::of(prop::sample::select(vec!["a", "b", "c", "d", "e"])),
            any::<bool>(),
        )
            .prop_map(|(owner, target, conditional)| {
                let mut expr = vec![Expr::counter()];
                if conditional {
                    expr.push(Expr::Other(json!({ "match": { "op": "==", "left": 1, "right": 1 } })));
                }
                if let Some(target) = target {
                    expr.push(Expr::jump(target));
                }
                Rule {
                    family: owner.family,
                    table: owner.table,
                    chain: owner.name,
                    handle: None,
                    expr,
                }
            })
    }

    fn arb_state() -> impl Strategy<Value = State> {
        (
            prop::collection::vec((arb_identity(), 1u64..10_000), 0..8),
            prop::collection::vec(arb_rule(), 0..16),
        )
            .prop_map(|(chains, rules)| State {
                chains: chains
                    .into_iter()
                    .map(|(id, handle)| Chain {
                        family: id.family,
                        table: id.table,
                        name: id.name,
                        handle,
                    })
                    .collect(),
                // Unique handles so deletions map back to one rule
                rules: rules
                    .into_iter()
                    .zip(1u64..)
                    .map(|(mut rule, handle)| {
                        rule.handle = Some(handle);
                        rule
                    })
                    .collect(),
            })
    }

    proptest! {
        #[test]
        fn prop_prune_stale_equals_prune_of_difference(
            s in arb_state(),
            targets in prop::collection::vec(arb_identity(), 0..8),
            old in prop::collection::vec(arb_identity(), 0..8),
        ) {
            prop_assert_eq!(
                prune_stale(&s, &targets, &old),
                prune(&s, &difference(&targets, &old))
            );
        }

        #[test]
        fn prop_rule_deletions_precede_chain_deletions(
            s in arb_state(),
            targets in prop::collection::vec(arb_identity(), 0..8),
        ) {
            let commands = prune(&s, &targets);
            let first_chain = commands
                .iter()
                .position(|c| matches!(c, Command::DeleteChain { .. }))
                .unwrap_or(commands.len());
            let tail_is_chains = commands[first_chain..]
                .iter()
                .all(|c| matches!(c, Command::DeleteChain { .. }));
            prop_assert!(tail_is_chains);
        }

        #[test]
        fn prop_missing_targets_do_not_change_output(
            s in arb_state(),
            targets in prop::collection::vec(arb_identity(), 0..8),
        ) {
            let live: Vec<ChainIdentity> = targets
                .iter()
                .filter(|t| s.chains.iter().any(|c| &c.identity() == *t))
                .cloned()
                .collect();
            let mut padded = targets.clone();
            padded.push(ChainIdentity::new("arp", "nowhere", "ghost"));
            prop_assert_eq!(prune(&s, &padded), prune(&s, &live));
        }

        #[test]
        fn prop_hook_reconcile_idempotent(
            s in arb_state(),
            hooks in prop::collection::vec(
                (arb_identity(), prop::sample::select(vec!["a", "b", "c"])),
                0..6,
            ),
        ) {
            let hooks: Vec<_> = hooks
                .into_iter()
                .map(|(id, target)| hook(&id.family, &id.table, &id.name, target))
                .collect();
            let applied = apply_additions(&s, &reconcile(&s, &hooks));
            prop_assert!(reconcile(&applied, &hooks).is_empty());
        }

        #[test]
        fn prop_prune_only_deletes_rules_jumping_to_targets(
            s in arb_state(),
            targets in prop::collection::vec(arb_identity(), 0..8),
        ) {
            for command in prune(&s, &targets) {
                if let Command::DeleteRule { handle, .. } = command {
                    let rule = s.rules.iter().find(|r| r.handle == Some(handle)).unwrap();
                    let target = rule.resolved_jump_target().unwrap();
                    prop_assert!(targets.contains(&target));
                }
            }
        }
    }
}
