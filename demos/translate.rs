//! Translates a list of course units into tags, through an explicit field table.
//!
//! Run with `RUST_LOG=trace cargo run --example translate` to follow the field decisions.
use xmldoc::{
    Document, XmlResult,
    mapping::{FieldValue, MappingTable, TypeMapping},
};

struct ComponenteAvaliacao {
    nome: String,
    peso: i32,
}

struct Fuc {
    codigo: String,
    nome: String,
    ects: f64,
    observacoes: String,
    avaliacao: Vec<ComponenteAvaliacao>,
}
impl Fuc {
    fn new(codigo: &str, nome: &str, observacoes: &str, avaliacao: &[(&str, i32)]) -> Self {
        Self {
            codigo: codigo.to_string(),
            nome: nome.to_string(),
            ects: 6.0,
            observacoes: observacoes.to_string(),
            avaliacao: avaliacao
                .iter()
                .map(|&(nome, peso)| ComponenteAvaliacao {
                    nome: nome.to_string(),
                    peso,
                })
                .collect(),
        }
    }
}

fn main() -> XmlResult<()> {
    env_logger::init();

    let table = MappingTable::new()
        .with(
            TypeMapping::<ComponenteAvaliacao>::new()
                .attribute("nome", |c| FieldValue::scalar(c.nome.as_str()))
                .attribute("peso", |c| FieldValue::scalar(c.peso)),
        )
        .with(
            TypeMapping::<Fuc>::named("FUC")
                .with_adapter("FUCAdapter")
                .attribute("codigo", |f| FieldValue::scalar(f.codigo.as_str()))
                .field("nome", |f| FieldValue::scalar(f.nome.as_str()))
                .field("ects", |f| FieldValue::scalar(f.ects))
                .exclude("observacoes")
                .field("avaliacao", |f| FieldValue::collection(&f.avaliacao)),
        );

    let fucs = [
        Fuc::new(
            "M123",
            "Programação Avançada",
            "Quase a acabar ...",
            &[("Quizzes", 20), ("Projeto", 80)],
        ),
        Fuc::new(
            "N456",
            "Gestão de tempo",
            "Nunca é de mais",
            &[("Assiduidade", 20), ("Trabalho_Grupo", 30), ("Trabalho_Individual", 50)],
        ),
        Fuc::new(
            "O789",
            "Networking",
            "Dá sempre jeito",
            &[("Participacao", 25), ("Teste_1", 35), ("Teste_2", 40)],
        ),
    ];

    let mut document = Document::with_root("fucs")?;
    table.translate_slice(&mut document.root_mut(), &fucs)?;
    print!("{}", document.serialize());

    let skipped: usize = fucs.iter().map(|f| f.observacoes.len()).sum();
    log::info!("left out {skipped} bytes of observacoes");
    Ok(())
}
