use std::{
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

/// A small soil vocabulary with a scheme, three concepts and a collection.
pub const SOIL_TTL: &str = r#"
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix dct: <http://purl.org/dc/terms/> .
@prefix soil: <http://example.org/def/soil/> .

<http://example.org/def/soil> a skos:ConceptScheme ;
    skos:prefLabel "Soil Types"@en ;
    dct:description "Soil types used in field surveys." ;
    dct:creator "Soil Survey Unit" ;
    dct:created "2019-03-01" ;
    skos:hasTopConcept soil:clay .

soil:loam a skos:Concept ;
    skos:prefLabel "Lehm"@de , "Loam"@en ;
    skos:altLabel "Loamy soil"@en ;
    skos:definition "Soil with roughly equal sand and silt."@en ;
    skos:narrower soil:sandy-loam ;
    skos:inScheme <http://example.org/def/soil> ;
    skos:topConceptOf <http://example.org/def/soil> .

soil:sandy-loam a skos:Concept ;
    skos:prefLabel "Sandy loam"@en ;
    skos:inScheme <http://example.org/def/soil> .

soil:clay a skos:Concept ;
    skos:prefLabel "Clay"@en ;
    skos:inScheme <http://example.org/def/soil> .

soil:textures a skos:Collection ;
    skos:prefLabel "Soil textures"@en ;
    skos:member soil:clay , soil:loam .
"#;

/// Writes `content` to a unique file in the system temp dir.
///
/// # Panics
///
/// Panics when the file cannot be written.
#[must_use]
pub fn write_graph(name: &str, content: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    let path = std::env::temp_dir().join(format!(
        "vocpub-{name}-{}-{nanos}.ttl",
        std::process::id()
    ));
    std::fs::write(&path, content).expect("write graph fixture");
    path
}
