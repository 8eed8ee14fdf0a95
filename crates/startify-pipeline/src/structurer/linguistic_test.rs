use super::*;
use crate::structurer::annotator::EntitySpan;
use crate::PipelineError;

/// Build a doc from `(word, pos, dep, head)` rows; offsets are computed by
/// locating each word in `text` left to right.
fn parse(text: &str, rows: &[(&str, &str, &str, usize)]) -> AnnotatedDoc {
    let mut cursor = 0;
    let tokens = rows
        .iter()
        .enumerate()
        .map(|(id, &(word, pos, dep, head))| {
            let byte = cursor + text[cursor..].find(word).expect("word present in text");
            cursor = byte + word.len();
            let start = text[..byte].chars().count();
            Token {
                id,
                start,
                end: start + word.chars().count(),
                pos: pos.to_string(),
                dep: dep.to_string(),
                head,
            }
        })
        .collect();
    AnnotatedDoc {
        text: text.to_string(),
        tokens,
        ents: vec![],
    }
}

fn grocery_doc() -> AnnotatedDoc {
    parse(
        "smart grocery app for rural areas with delivery and digital payments",
        &[
            ("smart", "ADJ", "amod", 2),
            ("grocery", "NOUN", "compound", 2),
            ("app", "NOUN", "ROOT", 2),
            ("for", "ADP", "prep", 2),
            ("rural", "ADJ", "amod", 5),
            ("areas", "NOUN", "pobj", 3),
            ("with", "ADP", "prep", 2),
            ("delivery", "NOUN", "pobj", 6),
            ("and", "CCONJ", "cc", 7),
            ("digital", "ADJ", "amod", 10),
            ("payments", "NOUN", "conj", 7),
        ],
    )
}

#[test]
fn canonical_grocery_idea() {
    let idea = structure_annotated(&grocery_doc());
    assert_eq!(idea.industry, "grocery");
    assert_eq!(idea.target_audience, "rural areas");
    assert!(idea.features.contains(&"delivery".to_string()));
    assert!(idea.features.contains(&"digital payments".to_string()));
    assert_eq!(idea.raw, grocery_doc().text);
}

#[test]
fn noun_chunks_fold_compounds_into_heads() {
    let doc = grocery_doc();
    let chunks: Vec<&str> = noun_chunks(&doc)
        .into_iter()
        .map(|(s, e)| doc.slice(doc.tokens[s].start, doc.tokens[e].end))
        .collect();
    assert_eq!(
        chunks,
        vec!["smart grocery app", "rural areas", "delivery", "digital payments"]
    );
}

#[test]
fn audience_from_children_of_for_head() {
    // "tool for busy parents": the object hangs off the product noun here.
    let doc = parse(
        "budget tool for busy parents",
        &[
            ("budget", "NOUN", "compound", 1),
            ("tool", "NOUN", "ROOT", 1),
            ("for", "ADP", "prep", 1),
            ("busy", "ADJ", "amod", 1),
            ("parents", "NOUN", "npadvmod", 1),
        ],
    );
    let idea = structure_annotated(&doc);
    assert_eq!(idea.industry, "budget");
    assert_eq!(idea.target_audience, "busy parents");
}

#[test]
fn industry_via_keyword_child() {
    // Keyword governed by the noun rather than following it.
    let doc = parse(
        "travel booking via app",
        &[
            ("travel", "NOUN", "compound", 1),
            ("booking", "NOUN", "ROOT", 1),
            ("via", "ADP", "prep", 1),
            ("app", "NOUN", "pobj", 1),
        ],
    );
    assert_eq!(structure_annotated(&doc).industry, "booking");
}

#[test]
fn defaults_without_signals() {
    let doc = parse(
        "something nice",
        &[("something", "PRON", "ROOT", 0), ("nice", "ADJ", "amod", 0)],
    );
    let idea = structure_annotated(&doc);
    assert_eq!(idea.industry, "general");
    assert_eq!(idea.target_audience, "general public");
    assert!(idea.features.is_empty());
}

#[test]
fn entities_carry_labels_and_offsets() {
    let mut doc = parse(
        "Uber for Berlin",
        &[
            ("Uber", "PROPN", "ROOT", 0),
            ("for", "ADP", "prep", 0),
            ("Berlin", "PROPN", "pobj", 1),
        ],
    );
    doc.ents = vec![
        EntitySpan {
            start: 0,
            end: 4,
            label: "ORG".to_string(),
        },
        EntitySpan {
            start: 9,
            end: 15,
            label: "GPE".to_string(),
        },
    ];
    let idea = structure_annotated(&doc);
    assert_eq!(idea.entities.len(), 2);
    assert_eq!(idea.entities[1].text, "Berlin");
    assert_eq!(idea.entities[1].label, "GPE");
    assert_eq!(idea.target_audience, "Berlin");
}

struct CannedAnnotator(Option<AnnotatedDoc>);

#[async_trait]
impl Annotator for CannedAnnotator {
    async fn annotate(&self, _text: &str) -> Result<AnnotatedDoc, PipelineError> {
        self.0
            .clone()
            .ok_or_else(|| PipelineError::Annotator("offline".to_string()))
    }
}

#[tokio::test]
async fn uses_annotator_output() {
    let structurer = LinguisticStructurer::new(Arc::new(CannedAnnotator(Some(grocery_doc()))));
    let idea = structurer.structure(&grocery_doc().text).await;
    assert_eq!(idea.industry, "grocery");
    assert_eq!(structurer.strategy(), "linguistic");
}

#[tokio::test]
async fn annotation_failure_falls_back_to_patterns() {
    let structurer = LinguisticStructurer::new(Arc::new(CannedAnnotator(None)));
    let raw = "fitness tracking app for elderly people with health monitoring";
    let idea = structurer.structure(raw).await;
    assert_eq!(idea, structure_with_patterns(raw));
    assert_eq!(idea.industry, "fitness");
}

fn one_based_doc() -> AnnotatedDoc {
    let mut doc = parse(
        "app for kids",
        &[
            ("app", "NOUN", "ROOT", 0),
            ("for", "ADP", "prep", 0),
            ("kids", "NOUN", "pobj", 1),
        ],
    );
    for token in &mut doc.tokens {
        token.id += 1;
    }
    doc
}

#[test]
fn misnumbered_tokens_still_structure() {
    let idea = structure_annotated(&one_based_doc());
    assert!(!idea.industry.is_empty());
    assert!(!idea.target_audience.is_empty());
    assert_eq!(idea.raw, "app for kids");
}

#[tokio::test]
async fn misnumbered_annotation_falls_back_to_patterns() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/annotate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(one_based_doc()))
        .mount(&server)
        .await;

    let client = crate::structurer::AnnotatorClient::new(&server.uri(), 5).unwrap();
    let structurer = LinguisticStructurer::new(Arc::new(client));
    let idea = structurer.structure("app for kids").await;
    assert_eq!(idea, structure_with_patterns("app for kids"));
}
