#![allow(dead_code)]

use richform_core::{
    ClassDescriptor, DataMapper, DataTransformer, DefaultPropertyAccessor, DomainObject,
    ExceptionHandlerRegistry, Factory, Failure, FieldConfig, FieldNode, FormDataMapper,
    FormExceptionHandler, IntegerToStringTransformer, MappingResult, Parameter, ParameterKind,
    PropertyAccessor, PropertyPathMapper, ReadPropertyPath, Signature, Value,
    ValueObjectTransformer,
};
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    amount: i64,
}

impl Price {
    pub fn new(amount: i64) -> Self {
        Self { amount }
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn class() -> ClassDescriptor {
        ClassDescriptor::new("Price")
            .with_constructor(amount_signature(), build_price)
            .with_static_method("fromAmount", amount_signature(), build_price)
    }
}

impl DomainObject for Price {
    fn class_name(&self) -> &str {
        "Price"
    }

    fn read_property(&self, name: &str) -> Option<Value> {
        (name == "amount").then(|| Value::Int(self.amount))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrossPrice {
    amount: i64,
    tax_rate: i64,
}

impl GrossPrice {
    pub fn new(amount: i64, tax_rate: i64) -> Result<Self, Failure> {
        if tax_rate < 0 {
            return Err(Failure::domain(
                "InvalidArgument",
                "Tax rate must not be negative.",
            ));
        }
        Ok(Self { amount, tax_rate })
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn tax_rate(&self) -> i64 {
        self.tax_rate
    }

    pub fn class() -> ClassDescriptor {
        ClassDescriptor::new("GrossPrice")
            .with_constructor(gross_price_signature(), build_gross_price)
            .with_static_method(
                "withAmountAndTaxRate",
                gross_price_signature(),
                build_gross_price,
            )
    }

    pub fn class_with_private_constructor() -> ClassDescriptor {
        ClassDescriptor::new("PrivateGrossPrice")
            .with_private_constructor(gross_price_signature(), build_gross_price)
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

/// Mutable entity holding a value object and a shipping address that can
/// only change as a whole.
#[derive(Debug)]
pub struct Order {
    pub reference: String,
    pub price: Value,
    pub street: String,
    pub city: String,
    pub shipments: usize,
    pub property_writes: usize,
}

impl Order {
    pub fn new(reference: &str, price: GrossPrice) -> Self {
        Self {
            reference: reference.to_string(),
            price: Value::object(price),
            street: "Old Street".to_string(),
            city: "Paris".to_string(),
            shipments: 0,
            property_writes: 0,
        }
    }
}

impl DomainObject for Order {
    fn class_name(&self) -> &str {
        "Order"
    }

    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "reference" => Some(Value::from(self.reference.as_str())),
            "price" => Some(self.price.clone()),
            "street" => Some(Value::from(self.street.as_str())),
            "city" => Some(Value::from(self.city.as_str())),
            _ => None,
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<(), Failure> {
        match (name, value) {
            ("reference", Value::String(reference)) => {
                self.reference = reference;
                self.property_writes += 1;
                Ok(())
            }
            ("price", price @ Value::Object(_)) => {
                self.price = price;
                self.property_writes += 1;
                Ok(())
            }
            (name, value) => Err(Failure::ArgumentType {
                parameter: name.to_string(),
                expected: "string",
                given: value.kind(),
            }),
        }
    }

    fn signature(&self, method: &str) -> Option<Signature> {
        (method == "shipTo").then(|| {
            Signature::new(vec![
                Parameter::new("street", ParameterKind::String),
                Parameter::new("city", ParameterKind::String),
            ])
        })
    }

    fn call_method(&mut self, method: &str, args: Vec<Value>) -> Result<(), Failure> {
        match (method, args.as_slice()) {
            ("shipTo", [Value::String(street), Value::String(city)]) => {
                if city.is_empty() {
                    return Err(Failure::domain("InvalidAddress", "City is required."));
                }
                self.street = street.clone();
                self.city = city.clone();
                self.shipments += 1;
                Ok(())
            }
            _ => Err(Failure::UnknownMethod {
                class: "Order".to_string(),
                method: method.to_string(),
            }),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Fallback mapper that records which fields it was handed.
pub struct RecordingMapper {
    inner: PropertyPathMapper,
    pub reads: RefCell<Vec<Vec<String>>>,
    pub writes: RefCell<Vec<String>>,
}

impl RecordingMapper {
    pub fn new() -> Self {
        Self {
            inner: PropertyPathMapper::new(accessor()),
            reads: RefCell::new(Vec::new()),
            writes: RefCell::new(Vec::new()),
        }
    }
}

impl FormDataMapper for RecordingMapper {
    fn map_data_to_forms(
        &self,
        data: &Value,
        fields: &mut [&mut FieldNode],
    ) -> MappingResult<()> {
        self.reads
            .borrow_mut()
            .push(fields.iter().map(|field| field.name().to_string()).collect());
        self.inner.map_data_to_forms(data, fields)
    }

    fn map_forms_to_data(
        &self,
        fields: &mut [&mut FieldNode],
        data: &mut Value,
    ) -> MappingResult<()> {
        self.writes
            .borrow_mut()
            .extend(fields.iter().map(|field| field.name().to_string()));
        self.inner.map_forms_to_data(fields, data)
    }
}

pub fn amount_signature() -> Signature {
    Signature::new(vec![Parameter::new("amount", ParameterKind::Int)])
}

pub fn gross_price_signature() -> Signature {
    Signature::new(vec![
        Parameter::new("amount", ParameterKind::Int),
        Parameter::new("taxRate", ParameterKind::Int),
    ])
}

fn build_price(args: Vec<Value>) -> Result<Value, Failure> {
    let amount = args.first().and_then(Value::as_int).unwrap_or_default();
    Ok(Value::object(Price::new(amount)))
}

fn build_gross_price(args: Vec<Value>) -> Result<Value, Failure> {
    let amount = args.first().and_then(Value::as_int).unwrap_or_default();
    let tax_rate = args.get(1).and_then(Value::as_int).unwrap_or_default();
    GrossPrice::new(amount, tax_rate).map(Value::object)
}

pub fn accessor() -> Rc<dyn PropertyAccessor> {
    Rc::new(DefaultPropertyAccessor::new())
}

pub fn registry() -> Rc<ExceptionHandlerRegistry> {
    Rc::new(ExceptionHandlerRegistry::with_default_handlers())
}

pub fn data_mapper(fallback: Rc<dyn FormDataMapper>) -> Rc<dyn FormDataMapper> {
    Rc::new(DataMapper::new(
        fallback,
        accessor(),
        FormExceptionHandler::new(registry()),
    ))
}

pub fn value_object_transformer() -> Rc<dyn DataTransformer> {
    Rc::new(ValueObjectTransformer::new(registry(), accessor()))
}

pub fn integer_field(name: &str) -> FieldNode {
    FieldNode::new(
        name,
        FieldConfig {
            view_transformers: vec![Rc::new(IntegerToStringTransformer::new())],
            ..FieldConfig::default()
        },
    )
}

/// Non-compound price field showing the amount of a `Price`.
pub fn price_form(factory: Factory, data: Value) -> FieldNode {
    let mut form = FieldNode::new(
        "price",
        FieldConfig {
            factory: Some(factory),
            read_property_path: Some(ReadPropertyPath::path("amount")),
            model_transformers: vec![value_object_transformer()],
            view_transformers: vec![Rc::new(IntegerToStringTransformer::new())],
            ..FieldConfig::default()
        },
    );
    form.set_data(data).unwrap();
    form
}

/// Compound gross price field with `amount`, `taxRate` and a button.
pub fn gross_price_form(config: FieldConfig, data: Value) -> FieldNode {
    let mut form = FieldNode::new(
        "price",
        FieldConfig {
            compound: true,
            data_mapper: Some(data_mapper(Rc::new(PropertyPathMapper::new(accessor())))),
            model_transformers: vec![value_object_transformer()],
            ..config
        },
    )
    .with_child(integer_field("amount"))
    .with_child(integer_field("taxRate"))
    .with_child(FieldNode::button("save"));
    form.set_data(data).unwrap();
    form
}

pub fn gross_price(amount: i64, tax_rate: i64) -> Value {
    Value::object(GrossPrice::new(amount, tax_rate).unwrap())
}
