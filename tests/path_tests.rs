//! Properties of the relative-path model.

use roam_tui::core::path::{PathError, RelPath, resolve_under_root};

#[test]
fn round_trip_normalizes_separators() {
    // join(segments(p)) is the normalized form of p.
    let cases = [
        ("a/b/c", "a/b/c"),
        ("a//b", "a/b"),
        ("/a/b/", "a/b"),
        ("", ""),
        ("single", "single"),
    ];
    for (input, normalized) in cases {
        assert_eq!(RelPath::parse(input).joined(), normalized, "input: {input:?}");
        // Idempotent: parsing the joined form is a fixpoint.
        let once = RelPath::parse(input);
        assert_eq!(RelPath::parse(&once.joined()), once);
    }
}

#[test]
fn depth_never_goes_negative_through_navigation() {
    // Walking down and up any which way, parent() refuses to go past
    // the root rather than wrapping or clamping oddly.
    let mut path = RelPath::root();
    for name in ["a", "b", "c"] {
        path = path.child(name);
    }
    for expected in [2, 1, 0] {
        path = path.parent().expect("parent must exist above depth 0");
        assert_eq!(path.depth(), expected);
    }
    assert_eq!(path.parent(), None);
}

#[test]
fn resolve_applies_dot_dot_strictly() {
    let base = RelPath::parse("x/y");

    assert_eq!(resolve_under_root(&base, "z").unwrap().joined(), "x/y/z");
    assert_eq!(resolve_under_root(&base, "./././z").unwrap().joined(), "x/y/z");
    assert_eq!(resolve_under_root(&base, "../..").unwrap(), RelPath::root());

    // One `..` too many is an error, never a silent clamp.
    assert_eq!(
        resolve_under_root(&base, "../../.."),
        Err(PathError::AboveRoot)
    );
}

#[test]
fn resolve_rejects_absolute_and_remote_input() {
    let base = RelPath::parse("x");
    for bad in ["/abs", "\\\\server\\share", "D:/stuff", "gdrive:dir", "a:b"] {
        assert_eq!(
            resolve_under_root(&base, bad),
            Err(PathError::AbsoluteInput),
            "input: {bad:?}"
        );
    }
}
