use datatype::{coerce, validate, Schema, Value};
use serde_json::json;

fn main() {
    let schema = match Schema::from_json_str(
        r#"{
            "user": {
                "name": "str",
                "age": "int",
                "optional email": "nullable str"
            }
        }"#,
    ) {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("Invalid datatype: {e:?}");
            return;
        }
    };

    let data = Value::from(json!({"user": {"name": "John Doe", "age": "42"}}));

    match validate(&schema, &data) {
        Ok(failures) if failures.is_empty() => println!("Data is valid"),
        Ok(failures) => {
            println!("Found {} problem(s):", failures.len());
            for failure in &failures {
                println!("  {failure}");
            }
        }
        Err(e) => eprintln!("Invalid datatype: {e:?}"),
    }

    match coerce(&schema, &data) {
        Ok(coerced) => {
            let json_output = serde_json::to_string_pretty(&coerced).unwrap();
            println!("Coerced data:\n{json_output}");
        }
        Err(e) => eprintln!("Invalid datatype: {e:?}"),
    }
}
