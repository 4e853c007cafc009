use omni_core::models::transcript::{MessageRole, Sentiment};
use omni_directives::{
    Block, DirectiveKind, ScoreChart, StreamRenderer, VizKind, VizPoint, render_message,
};

const REPLY: &str = "Safety Notice: informational only. --- ### Future Health\n\
Jane's scores are improving.\n\
{score: Future Health, 55.6, 61.1}\n\
{viz: {\"type\": \"line\", \"title\": \"Historical Progress: Future Health\", \"data\": [{\"label\": \"Jan\", \"child\": 45, \"parent\": 50}, {\"label\": \"Dec\", \"child\": 55.6, \"parent\": 61.1}]}}\n\
{insight: **Jane** worries less than her parent thinks}";

#[test]
fn full_reply_renders_every_widget() {
    let rendered = render_message(REPLY, MessageRole::Model);

    assert_eq!(rendered.disclaimer.as_deref(), Some("Safety Notice: informational only."));
    assert_eq!(rendered.widget_count(), 3);

    let non_spacers: Vec<&Block> = rendered
        .blocks
        .iter()
        .filter(|b| !matches!(b, Block::Spacer))
        .collect();

    assert_eq!(
        non_spacers[0],
        &Block::Header { text: "Future Health".to_string() }
    );
    assert_eq!(
        non_spacers[1],
        &Block::Paragraph { text: "Jane's scores are improving.".to_string() }
    );
    assert_eq!(
        non_spacers[2],
        &Block::Score(ScoreChart {
            label: "Future Health".to_string(),
            child: 55.6,
            parent: 61.1,
        })
    );
    match non_spacers[3] {
        Block::Viz(spec) => {
            assert_eq!(spec.kind, VizKind::Line);
            assert_eq!(spec.title, "Historical Progress: Future Health");
            assert_eq!(spec.data.len(), 2);
            assert!(matches!(&spec.data[1], VizPoint::Series { child, .. } if *child == 55.6));
        }
        other => panic!("expected viz block, got {other:?}"),
    }
    assert_eq!(
        non_spacers[4],
        &Block::Insight { text: "Jane worries less than her parent thinks".to_string() }
    );
}

#[test]
fn split_directive_is_pending_until_closed() {
    let mut renderer = StreamRenderer::new(MessageRole::Model);

    let frame = renderer.push("Notice --- Compare: {score: Coping & Adjustment, 68");
    assert_eq!(
        frame.rendered.blocks.last(),
        Some(&Block::Pending { directive: DirectiveKind::Score })
    );
    assert!(frame.rendered.is_pending());

    let frame = renderer.push(".8, 71.9}");
    assert!(!frame.rendered.is_pending());
    assert_eq!(frame.rendered.widget_count(), 1);
    assert_eq!(renderer.chunk_count(), 2);
}

#[test]
fn final_render_shows_unclosed_directive_as_text() {
    let mut renderer = StreamRenderer::new(MessageRole::Model);
    renderer.push("Looking at {insight: cut off");
    let (text, frame) = renderer.finish();

    assert_eq!(text, "Looking at {insight: cut off");
    assert_eq!(
        frame.rendered.blocks,
        [Block::Paragraph { text: "Looking at {insight: cut off".to_string() }]
    );
}

#[test]
fn sentiment_tracks_the_whole_buffer() {
    let mut renderer = StreamRenderer::new(MessageRole::Model);
    let frame = renderer.push("There is a concern ");
    assert_eq!(frame.sentiment, Sentiment::Negative);

    let frame = renderer.push("but great progress and healthy habits");
    assert_eq!(frame.sentiment, Sentiment::Positive);
}

#[test]
fn disclaimer_appears_once_separator_streams_in() {
    let mut renderer = StreamRenderer::new(MessageRole::Model);
    let frame = renderer.push("Safety Notice: not medical advice. ");
    assert_eq!(frame.rendered.disclaimer, None);

    let frame = renderer.push("--- Hello!");
    assert_eq!(
        frame.rendered.disclaimer.as_deref(),
        Some("Safety Notice: not medical advice.")
    );
    assert_eq!(frame.rendered.blocks, [Block::Paragraph { text: "Hello!".to_string() }]);
}

#[test]
fn closed_directives_do_not_hold_back_later_text() {
    let mut renderer = StreamRenderer::new(MessageRole::Model);
    let frame = renderer
        .push("Notice --- Gap: {score: Coping, high, low} is notable.\nMore analysis follows here.");
    assert!(!frame.rendered.is_pending());
    assert_eq!(
        frame.rendered.blocks,
        [
            Block::Paragraph { text: "Gap: {score: Coping, high, low} is notable.".to_string() },
            Block::Spacer,
            Block::Paragraph { text: "More analysis follows here.".to_string() },
        ]
    );

    let mut renderer = StreamRenderer::new(MessageRole::Model);
    let frame = renderer.push("Notice --- {insight: Jane is resilient} and copes well");
    assert_eq!(
        frame.rendered.blocks,
        [
            Block::Insight { text: "Jane is resilient".to_string() },
            Block::Paragraph { text: "and copes well".to_string() },
        ]
    );
}
