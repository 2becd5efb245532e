use std::path::Path;

use tikzfsm::{AcceptingStyle, Config, generate, parse_machine};

fn assert_valid_tikz(tikz: &str, fixture: &str, state_count: usize) {
    assert!(
        tikz.contains("\\begin{tikzpicture}"),
        "{fixture}: missing picture open"
    );
    assert!(
        tikz.ends_with("\\end{tikzpicture}\n"),
        "{fixture}: missing picture close"
    );
    let nodes = tikz.matches("\\node[state").count();
    assert_eq!(nodes, state_count, "{fixture}: node count mismatch");
    let opens = tikz.matches('{').count();
    let closes = tikz.matches('}').count();
    assert_eq!(opens, closes, "{fixture}: unbalanced braces");
}

fn render_fixture(path: &Path, accepting: AcceptingStyle) -> (String, usize) {
    let input = std::fs::read_to_string(path).expect("fixture read failed");
    let parsed = parse_machine(&input).expect("parse failed");
    let mut config = Config::default();
    config.style.accepting = accepting;
    let tikz = generate(&parsed.machine, &config).expect("generate failed");
    (tikz, parsed.machine.states.len())
}

#[test]
fn render_all_fixtures() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");

    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = [
        "two_state.fsm",
        "single_loop.fsm",
        "mutual.fsm",
        "chain.fsm",
        "nondeterministic.fsm",
        "named_states.fsm",
    ];

    for rel in candidates {
        let path = root.join(rel);
        assert!(path.exists(), "fixture missing: {}", rel);
        for accepting in [AcceptingStyle::ByDoubleBorder, AcceptingStyle::ByArrow] {
            let (tikz, states) = render_fixture(&path, accepting);
            assert_valid_tikz(&tikz, rel, states);
        }
    }
}

#[test]
fn output_is_deterministic() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");
    let path = root.join("chain.fsm");
    let (first, _) = render_fixture(&path, AcceptingStyle::ByDoubleBorder);
    let (second, _) = render_fixture(&path, AcceptingStyle::ByDoubleBorder);
    assert_eq!(first, second);
}

#[test]
fn two_state_fixture_matches_the_expected_picture() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");
    let (tikz, _) = render_fixture(&root.join("two_state.fsm"), AcceptingStyle::ByDoubleBorder);
    assert!(tikz.contains("\\node[state,initial] (q1) {$q_{1}$};"));
    assert!(tikz.contains("\\node[state,accepting] (q2) [right of=q1] {$q_{2}$};"));
    assert!(tikz.contains("(q1) edge [loop below] node {0} (q1)"));
    assert!(tikz.contains("(q1) edge node [above] {1} (q2)"));
}

#[test]
fn mutual_fixture_separates_its_arcs() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");
    let (tikz, _) = render_fixture(&root.join("mutual.fsm"), AcceptingStyle::ByDoubleBorder);
    assert!(tikz.contains("(q1) edge [bend left] node [above] {0} (q2)"));
    assert!(tikz.contains("(q2) edge [bend left] node [below] {0} (q1)"));
}
