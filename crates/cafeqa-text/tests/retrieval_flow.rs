use cafeqa_core::traits::Retriever;
use cafeqa_core::types::{CorpusEntry, DocumentChunk, QaRecord};
use cafeqa_text::{TfidfOptions, TfidfRetriever};

fn faq() -> Vec<CorpusEntry> {
    [
        ("¿Cuánto cuesta un café solo?", "El café solo cuesta 1,10 €."),
        ("¿Cuánto cuesta un bocadillo?", "Los bocadillos cuestan entre 2,50 € y 3,80 €."),
        ("¿A qué hora abre la cafetería?", "Abre a las 8:00."),
    ]
    .iter()
    .enumerate()
    .map(|(i, (q, a))| {
        let r = QaRecord { id: format!("qa-{:03}", i + 1), question: q.to_string(), answer: a.to_string(), source: "cafeteria.json".into() };
        CorpusEntry::from(&r)
    })
    .collect()
}

fn search_all<R: Retriever>(r: &R, q: &str) -> Vec<(String, f32)> {
    r.search(q, r.entries().len()).into_iter().map(|h| (h.entry.id().to_string(), h.score)).collect()
}

#[test]
fn faq_questions_rank_their_own_entry_first() {
    let r = TfidfRetriever::new(faq(), TfidfOptions::default()).expect("retriever");
    assert!(r.vocabulary_len() > 10);

    let hits = search_all(&r, "cuanto cuesta un cafe solo");
    assert_eq!(hits[0].0, "qa-001");
    assert!(hits[0].1 > 0.25, "score {}", hits[0].1);
    assert!(hits.windows(2).all(|w| w[0].1 >= w[1].1));

    let hits = search_all(&r, "HORA de apertura");
    assert_eq!(hits[0].0, "qa-003");
}

#[test]
fn one_entry_corpus_always_returns_that_entry() {
    let chunk = DocumentChunk { id: "pdf-001-01".into(), page: 1, text: "Menú del día 6,50 €".into(), source: "precios.pdf#page=1".into() };
    let r = TfidfRetriever::new(vec![CorpusEntry::from(&chunk)], TfidfOptions::default()).expect("retriever");
    for q in ["menú", "algo totalmente distinto", "6,50"] {
        let first = r.search(q, 5);
        let second = r.search(q, 5);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].entry.id(), "pdf-001-01");
        assert!(first[0].score >= 0.0);
        assert_eq!(first, second);
    }
}

#[test]
fn retriever_is_shareable_across_threads() {
    let r = TfidfRetriever::new(faq(), TfidfOptions::default()).expect("retriever");
    let r = &r;
    std::thread::scope(|s| {
        let handles: Vec<_> = ["café", "bocadillo", "hora"]
            .into_iter()
            .map(|q| s.spawn(move || r.search(q, 1)[0].entry.id().to_string()))
            .collect();
        let ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(ids, ["qa-001", "qa-002", "qa-003"]);
    });
}
