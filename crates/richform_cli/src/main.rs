//! CLI demo for the binding engine.
//!
//! # Responsibility
//! - Bind a gross price value object to a compound form, submit a JSON
//!   payload from argv and print the outcome as JSON.
//! - Initialize file logging from `RICHFORM_LOG_DIR` / `RICHFORM_LOG_LEVEL`.
//!
//! Usage: `richform_cli '{"amount": "650", "taxRate": "7"}'`

use log::info;
use richform_core::{
    ClassDescriptor, DataMapper, DefaultPropertyAccessor, DomainObject, ExceptionHandlerRegistry,
    Factory, Failure, FieldConfig, FieldNode, FormExceptionHandler, IntegerToStringTransformer,
    Parameter, ParameterKind, PropertyAccessor, PropertyPathMapper, Signature, Value,
    ValueObjectTransformer,
};
use serde_json::json;
use std::any::Any;
use std::process::ExitCode;
use std::rc::Rc;

#[derive(Debug)]
struct GrossPrice {
    amount: i64,
    tax_rate: i64,
}

impl GrossPrice {
    fn new(amount: i64, tax_rate: i64) -> Result<Self, Failure> {
        if tax_rate < 0 {
            return Err(Failure::domain(
                "InvalidArgument",
                "Tax rate must not be negative.",
            ));
        }
        Ok(Self { amount, tax_rate })
    }

    fn class() -> ClassDescriptor {
        let signature = Signature::new(vec![
            Parameter::new("amount", ParameterKind::Int),
            Parameter::new("taxRate", ParameterKind::Int),
        ]);
        ClassDescriptor::new("GrossPrice").with_constructor(signature, |args| {
            let amount = args.first().and_then(Value::as_int).unwrap_or_default();
            let tax_rate = args.get(1).and_then(Value::as_int).unwrap_or_default();
            GrossPrice::new(amount, tax_rate).map(Value::object)
        })
    }
}

impl DomainObject for GrossPrice {
    fn class_name(&self) -> &str {
        "GrossPrice"
    }

    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "amount" => Some(Value::Int(self.amount)),
            "taxRate" => Some(Value::Int(self.tax_rate)),
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn build_form() -> Result<FieldNode, String> {
    let accessor: Rc<dyn PropertyAccessor> = Rc::new(DefaultPropertyAccessor::new());
    let registry = Rc::new(ExceptionHandlerRegistry::with_default_handlers());
    let data_mapper = DataMapper::new(
        Rc::new(PropertyPathMapper::new(accessor.clone())),
        accessor.clone(),
        FormExceptionHandler::new(registry.clone()),
    );
    let integer = || FieldConfig {
        view_transformers: vec![Rc::new(IntegerToStringTransformer::new())],
        ..FieldConfig::default()
    };

    let mut form = FieldNode::new(
        "price",
        FieldConfig {
            compound: true,
            factory: Some(Factory::class(GrossPrice::class())),
            expected_exception: vec!["InvalidArgument".to_string()],
            data_mapper: Some(Rc::new(data_mapper)),
            model_transformers: vec![Rc::new(ValueObjectTransformer::new(registry, accessor))],
            ..FieldConfig::default()
        },
    )
    .with_child(FieldNode::new("amount", integer()))
    .with_child(FieldNode::new("taxRate", integer()));

    let initial = GrossPrice::new(500, 19).map_err(|err| err.to_string())?;
    form.set_data(Value::object(initial))
        .map_err(|err| err.to_string())?;
    Ok(form)
}

fn run(payload: &str) -> Result<serde_json::Value, String> {
    let payload: serde_json::Value =
        serde_json::from_str(payload).map_err(|err| format!("invalid JSON payload: {err}"))?;

    let mut form = build_form()?;
    form.submit(Value::from_json(payload))
        .map_err(|err| err.to_string())?;

    let price = form
        .data()
        .with_object::<GrossPrice, _>(|price| {
            json!({ "amount": price.amount, "taxRate": price.tax_rate })
        })
        .unwrap_or(serde_json::Value::Null);
    let errors = form
        .children()
        .iter()
        .flat_map(|child| child.errors())
        .chain(form.errors())
        .map(|error| error.render())
        .collect::<Vec<_>>();

    info!(
        "event=demo_submit module=cli status=ok synchronized={}",
        form.is_synchronized()
    );
    Ok(json!({
        "synchronized": form.is_synchronized(),
        "price": price,
        "transformation_failure": form
            .transformation_failure()
            .map(|failed| failed.message.clone()),
        "errors": errors,
    }))
}

fn main() -> ExitCode {
    if let Err(err) = richform_core::init_logging_from_env() {
        eprintln!("logging disabled: {err}");
    }

    let payload = std::env::args()
        .nth(1)
        .unwrap_or_else(|| r#"{"amount": "650", "taxRate": "7"}"#.to_string());

    match run(&payload) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("richform_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn valid_payload_rebuilds_price() {
        let output = run(r#"{"amount": "650", "taxRate": "7"}"#).expect("demo should succeed");
        assert_eq!(output["synchronized"], true);
        assert_eq!(output["price"]["amount"], 650);
        assert_eq!(output["price"]["taxRate"], 7);
    }

    #[test]
    fn negative_tax_rate_reports_domain_message() {
        let output = run(r#"{"amount": "650", "taxRate": "-1"}"#).expect("demo should succeed");
        assert_eq!(output["synchronized"], false);
        assert_eq!(
            output["transformation_failure"],
            "Tax rate must not be negative."
        );
        assert_eq!(output["price"]["amount"], 500);
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = run("{").expect_err("malformed JSON must fail");
        assert!(err.contains("invalid JSON payload"));
    }
}
