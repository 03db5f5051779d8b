use readpace::{layout_lines, AssetContext, LayoutOptions, LineType};

#[test]
fn test_article_with_figures_and_equations_lays_out_end_to_end() {
    let text = "\
# Thermodynamics

Heat flows from hot to cold.It never flows the other way on its own.

[FIGURE:entropy-curve]

[FIGURE Entropy always increases in an isolated system]

The second law can be written compactly:

[EQN_IMAGE:4] [Clausius inequality]

And that is the whole story.";

    let opts = LayoutOptions {
        width: 40,
        assets: AssetContext {
            figure_base_url: Some("https://cdn.example.net/thermo".to_string()),
            source_path: Some("library/thermo/chapter-02.txt".to_string()),
        },
    };
    let lines = layout_lines(text, &opts);

    // Heading captured with its level, not rendered as '#' text.
    let heading = lines
        .iter()
        .find(|l| l.kind == LineType::Heading)
        .expect("heading line");
    assert_eq!(heading.text, "Thermodynamics");
    assert_eq!(heading.level, Some(1));

    // Run-together sentence got its separating space and wrapped at 40.
    assert!(lines
        .iter()
        .any(|l| l.text.contains("cold. It never")
            || l.text.ends_with("cold.")
            || l.text.starts_with("It never")));
    for line in &lines {
        if line.kind == LineType::Body {
            assert!(line.char_len() <= 40, "body line too wide: {:?}", line.text);
        }
    }

    // Figure resolved against the base URL, caption attached and consumed.
    let figure = lines
        .iter()
        .find(|l| l.kind == LineType::Figure && !l.is_equation)
        .expect("figure line");
    assert_eq!(
        figure.figure_src.as_deref(),
        Some("https://cdn.example.net/thermo/images/entropy-curve.jpg")
    );
    assert_eq!(
        figure.text,
        "Entropy always increases in an isolated system"
    );

    // Equation carries its index and per-chapter asset path.
    let equation = lines
        .iter()
        .find(|l| l.is_equation)
        .expect("equation line");
    assert_eq!(equation.equation_index, Some(4));
    assert_eq!(equation.text, "Clausius inequality");
    assert_eq!(
        equation.figure_src.as_deref(),
        Some("equation-images/chapter-02/eqn_004.jpg")
    );

    // No marker syntax leaks into display text.
    assert!(lines.iter().all(|l| !l.text.contains('[')));
}

#[test]
fn test_unrecognized_markers_never_fail_layout() {
    let weird = "[FIGURE:]\n\n[EQN_IMAGE:]\n\n[NOT A MARKER AT ALL]\n\n[FIGURE_URL:]";
    let lines = layout_lines(weird, &LayoutOptions::default());
    assert!(!lines.is_empty());
    assert!(lines
        .iter()
        .all(|l| l.kind == LineType::Body || l.kind == LineType::Blank));
}

#[test]
fn test_identical_input_produces_identical_lines() {
    let text = "# A\n\nSome body text that wraps.\n\n[FIGURE:x]\n\n[FIGURE A caption]";
    let opts = LayoutOptions::default();
    let a = layout_lines(text, &opts);
    let b = layout_lines(text, &opts);
    assert_eq!(a, b);
}
