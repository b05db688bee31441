mod common;
mod pain008_helpers;

use std::io::Write;
use chrono::Utc;
use quick_xml::se::Serializer;
use serde::Serialize;

use crate::error::ParseError;
use crate::model::BatchDocument;
use crate::pain008::{ConvertOptions, Pain008Document};

pub(crate) use common::format_minor_units;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

impl BatchDocument {
    /// Собирает документ pain.008.001.02 (SEPA Core direct debit initiation).
    ///
    /// Итоги берутся из разобранных значений, а не пересчитываются:
    /// `NbOfTxs`/`CtrlSum` заголовка - из итогов документа, каждого `PmtInf` - из итогов платежа на дату.
    pub fn to_pain008(&self, options: &ConvertOptions) -> Result<Pain008Document, ParseError> {
        let created_at = options
            .created_at
            .unwrap_or_else(|| Utc::now().naive_utc());
        let message_id = options
            .message_id
            .clone()
            .unwrap_or_else(|| pain008_helpers::generate_message_id(created_at));

        pain008_helpers::document_from_batch(self, options, message_id, created_at)
    }

    /// Записывает реестр в формате pain.008 (XML, UTF-8)
    pub fn write_pain008<W: Write>(&self, mut writer: W, options: &ConvertOptions) -> Result<(), ParseError> {
        let doc = self.to_pain008(options)?;

        let mut xml = String::new();
        let mut ser = Serializer::new(&mut xml);
        if options.pretty {
            ser.indent(' ', 2);
        }
        doc.serialize(ser)?;

        writer.write_all(XML_DECLARATION.as_bytes())?;
        writer.write_all(xml.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
