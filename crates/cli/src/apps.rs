//! Built-in sample app: a pension provider integration.
//!
//! Real deployments register their own apps here at startup; this one
//! exists so a fresh checkout serves something useful and exercises the
//! full descriptor vocabulary (records, enumerations, decimals, dates,
//! optionals, streams, byte results).

use async_trait::async_trait;
use rust_decimal::Decimal;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

use gantry_codec::{
    Descriptor, EnumDescriptor, EnumValue, RecordDescriptor, RecordValue, Scalar, Value,
};
use gantry_hooks::{HookFault, HookHandler, HookRegistry, HookSignature};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

// ──────────────────────────────────────────────
// Shapes
// ──────────────────────────────────────────────

fn deduction_kind() -> EnumDescriptor {
    EnumDescriptor::new("DeductionKind")
        .member("PRETAX", "pretax")
        .member("ROTH", "roth")
}

fn file_format() -> EnumDescriptor {
    EnumDescriptor::new("FileFormat")
        .member("CSV", "csv")
        .member("TSV", "tsv")
}

fn deduction_election() -> RecordDescriptor {
    RecordDescriptor::new("DeductionElection")
        .field("employee_id", Descriptor::text())
        .field("kind", Descriptor::Enum(deduction_kind()))
        .field("amount", Descriptor::Decimal)
        .field("percent", Descriptor::optional(Descriptor::Decimal))
        .field("effective", Descriptor::Date)
}

fn upload_settings() -> RecordDescriptor {
    RecordDescriptor::new("PayrollUploadSettings")
        .field("company", Descriptor::text())
        .field("pay_date", Descriptor::Date)
        .field("format", Descriptor::Enum(file_format()))
        .field("include_header", Descriptor::bool())
}

// ──────────────────────────────────────────────
// Field access helpers
// ──────────────────────────────────────────────

fn record_arg(value: &Value, what: &str) -> Result<RecordValue, HookFault> {
    value
        .as_record()
        .cloned()
        .ok_or_else(|| HookFault::new(format!("expected {} record, got {}", what, value.type_name())))
}

fn text_field(record: &RecordValue, name: &str) -> Result<String, HookFault> {
    record
        .get(name)
        .and_then(Value::as_text)
        .map(str::to_string)
        .ok_or_else(|| HookFault::new(format!("field '{}' is not text", name)))
}

fn bool_field(record: &RecordValue, name: &str) -> Result<bool, HookFault> {
    record
        .get(name)
        .and_then(Value::as_bool)
        .ok_or_else(|| HookFault::new(format!("field '{}' is not a bool", name)))
}

fn decimal_field(record: &RecordValue, name: &str) -> Result<Decimal, HookFault> {
    record
        .get(name)
        .and_then(Value::as_decimal)
        .ok_or_else(|| HookFault::new(format!("field '{}' is not a decimal", name)))
}

fn date_field(record: &RecordValue, name: &str) -> Result<Date, HookFault> {
    record
        .get(name)
        .and_then(Value::as_date)
        .ok_or_else(|| HookFault::new(format!("field '{}' is not a date", name)))
}

fn enum_field(record: &RecordValue, name: &str) -> Result<EnumValue, HookFault> {
    record
        .get(name)
        .and_then(Value::as_enum)
        .cloned()
        .ok_or_else(|| HookFault::new(format!("field '{}' is not an enum member", name)))
}

fn format_date(date: Date) -> Result<String, HookFault> {
    date.format(DATE_FORMAT)
        .map_err(|e| HookFault::new(format!("unformattable date: {}", e)))
}

// ──────────────────────────────────────────────
// parse_deductions
// ──────────────────────────────────────────────

/// Parses a carrier deduction file (CSV lines of
/// `employee_id,kind,amount,percent,effective`; percent may be empty)
/// into `DeductionElection` records.
struct ParseDeductions;

#[async_trait]
impl HookHandler for ParseDeductions {
    async fn invoke(&self, args: Vec<Value>) -> Result<Value, HookFault> {
        let mut args = args.into_iter();
        let uri = args
            .next()
            .and_then(|v| v.as_text().map(str::to_string))
            .ok_or_else(|| HookFault::new("expected text uri argument"))?;
        let stream = args
            .next()
            .and_then(|v| v.as_stream().cloned())
            .ok_or_else(|| HookFault::new("expected stream argument"))?;
        let text = stream
            .utf8_contents()
            .map(str::to_string)
            .ok_or_else(|| HookFault::new(format!("{}: deduction file is not utf-8 text", uri)))?;

        let kinds = deduction_kind();
        let mut elections = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split(',').collect();
            if parts.len() != 5 {
                return Err(HookFault::new(format!(
                    "{}: line {} has {} columns, expected 5",
                    uri,
                    line_no + 1,
                    parts.len()
                )));
            }
            let kind_member = kinds
                .member_for_value(&Scalar::from(parts[1].trim()))
                .ok_or_else(|| {
                    HookFault::new(format!(
                        "{}: line {} has unknown deduction kind '{}'",
                        uri,
                        line_no + 1,
                        parts[1]
                    ))
                })?;
            let kind = EnumValue {
                enumeration: kinds.name.clone(),
                member: kind_member.name.clone(),
                value: kind_member.value.clone(),
            };
            let amount: Decimal = parts[2].trim().parse().map_err(|e| {
                HookFault::new(format!("{}: line {} amount: {}", uri, line_no + 1, e))
            })?;
            let percent = if parts[3].trim().is_empty() {
                Value::Null
            } else {
                Value::Decimal(parts[3].trim().parse().map_err(|e| {
                    HookFault::new(format!("{}: line {} percent: {}", uri, line_no + 1, e))
                })?)
            };
            let effective = Date::parse(parts[4].trim(), DATE_FORMAT).map_err(|e| {
                HookFault::new(format!("{}: line {} effective date: {}", uri, line_no + 1, e))
            })?;

            elections.push(Value::Record(
                RecordValue::new("DeductionElection")
                    .field("employee_id", Value::Text(parts[0].trim().to_string()))
                    .field("kind", Value::Enum(kind))
                    .field("amount", Value::Decimal(amount))
                    .field("percent", percent)
                    .field("effective", Value::Date(effective)),
            ));
        }
        Ok(Value::List(elections))
    }
}

// ──────────────────────────────────────────────
// export_file_name
// ──────────────────────────────────────────────

/// Names the upload file from the settings record:
/// `<company>_<pay_date>.<format>`.
struct ExportFileName;

#[async_trait]
impl HookHandler for ExportFileName {
    async fn invoke(&self, args: Vec<Value>) -> Result<Value, HookFault> {
        let settings = record_arg(
            args.first().ok_or_else(|| HookFault::new("expected settings argument"))?,
            "PayrollUploadSettings",
        )?;
        let company = text_field(&settings, "company")?
            .to_lowercase()
            .replace(' ', "_");
        let pay_date = format_date(date_field(&settings, "pay_date")?)?;
        let format = enum_field(&settings, "format")?;
        Ok(Value::Text(format!("{}_{}.{}", company, pay_date, format.value)))
    }
}

// ──────────────────────────────────────────────
// format_deductions
// ──────────────────────────────────────────────

/// Renders deduction elections back into a carrier upload file and
/// returns its raw bytes.
struct FormatDeductions;

#[async_trait]
impl HookHandler for FormatDeductions {
    async fn invoke(&self, args: Vec<Value>) -> Result<Value, HookFault> {
        let mut args = args.into_iter();
        let records = args
            .next()
            .and_then(|v| v.as_list().map(|items| items.to_vec()))
            .ok_or_else(|| HookFault::new("expected list of deduction records"))?;
        let settings = record_arg(
            &args.next().ok_or_else(|| HookFault::new("expected settings argument"))?,
            "PayrollUploadSettings",
        )?;

        let separator = match enum_field(&settings, "format")?.member.as_str() {
            "TSV" => '\t',
            _ => ',',
        };
        let mut out = String::new();
        if bool_field(&settings, "include_header")? {
            let header = ["employee_id", "kind", "amount", "percent", "effective"];
            out.push_str(&header.join(&separator.to_string()));
            out.push('\n');
        }
        for record in &records {
            let election = record_arg(record, "DeductionElection")?;
            let percent = match election.get("percent") {
                Some(Value::Decimal(p)) => p.to_string(),
                _ => String::new(),
            };
            let row = [
                text_field(&election, "employee_id")?,
                enum_field(&election, "kind")?.value.to_string(),
                decimal_field(&election, "amount")?.to_string(),
                percent,
                format_date(date_field(&election, "effective")?)?,
            ];
            out.push_str(&row.join(&separator.to_string()));
            out.push('\n');
        }
        Ok(Value::Bytes(out.into_bytes()))
    }
}

// ──────────────────────────────────────────────
// Registration
// ──────────────────────────────────────────────

/// The registry served by default, with every built-in app registered.
pub fn builtin_registry() -> HookRegistry {
    let mut registry = HookRegistry::new();
    registry.register(
        "pension",
        HookSignature::new(
            "parse_deductions",
            Descriptor::list(Descriptor::Record(deduction_election())),
        )
        .param("uri", Descriptor::text())
        .param("content", Descriptor::Stream),
        ParseDeductions,
    );
    registry.register(
        "pension",
        HookSignature::new("export_file_name", Descriptor::text())
            .param("payroll_upload_settings", Descriptor::Record(upload_settings())),
        ExportFileName,
    );
    registry.register(
        "pension",
        HookSignature::new("format_deductions", Descriptor::Bytes)
            .param(
                "deduction_elections",
                Descriptor::list(Descriptor::Record(deduction_election())),
            )
            .param("payroll_upload_settings", Descriptor::Record(upload_settings())),
        FormatDeductions,
    );
    registry
}
