use streams_core::{DocumentError, Factory};

fn post(factory: &Factory) -> Result<String, DocumentError> {
    let jane = factory.person(|person| {
        person.set("display_name", "Jane")?;
        Ok(())
    })?;
    let note = factory.note(|note| {
        note.set("content", "hello")?;
        note.set("published", factory.now())?;
        Ok(())
    })?;
    let activity = factory.build("activity", |activity| {
        activity
            .set("verb", "post")?
            .set("actor", jane)?
            .set("object", note)?
            .pretty()?;
        Ok(())
    })?;
    Ok(activity.render()?)
}

fn main() {
    let factory = Factory::standard();
    match post(&factory) {
        Ok(text) => println!("{}", text),
        Err(err) => {
            eprintln!("building activity failed: {}", err);
            std::process::exit(1);
        }
    }
}
