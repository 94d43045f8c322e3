//! Builds a small study plan by hand, edits it, and writes it next to the working directory.
//!
//! Run with `RUST_LOG=debug cargo run --example writer` to see the tree operations logged.
use xmldoc::{Document, Value, XmlResult};

fn main() -> XmlResult<()> {
    env_logger::init();

    let mut document = Document::with_root("plano")?;
    document.root_mut().build(|plano| {
        plano.add_value_tag("curso", "Mestrado em Engenharia de Informática")?;
        plano.add_tag_with("fuc", None, |fuc| {
            fuc.add_attribute("codigo", "M4310")?;
            fuc.add_value_tag("nome", "Programação Avançada")?;
            fuc.add_value_tag("ects", 6.0)?;
            fuc.add_tag_with("avaliacao", None, |avaliacao| {
                for (nome, peso) in [("Quizzes", "20%"), ("Projeto", "80%")] {
                    let mut componente = avaliacao.add_tag("componente")?;
                    componente.add_attribute("nome", nome)?;
                    componente.add_attribute("peso", peso)?;
                }
                Ok(())
            })?;
            Ok(())
        })?;
        plano.add_tag_with("fuc", Some(Value::from("Dissertação")), |_| Ok(()))?;
        Ok(())
    })?;

    document.add_attribute_on_all_tags_named("componente", "obrigatorio", true)?;
    document.change_all_attributes_named("componente", "peso", "percentagem")?;
    println!("{}", document.serialize());

    for tag in document.search("fuc/avaliacao/componente") {
        println!("{} = {:?}", tag.path(), tag.attribute_value("nome"));
    }

    let removed = document.delete_all_tags_named("avaliacao", true);
    println!("removed {removed} avaliacao tags; {} tags left", document.size());

    let path = document.save_to_file("plano")?;
    println!("saved to {}", path.display());
    Ok(())
}
