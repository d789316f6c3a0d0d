use chrono::NaiveDate;
use quick_xml::Reader;
use quick_xml::events::Event;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::core::EinzugError;

/// Key figures of a pain.008 document, read back from XML.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pain008Summary {
    pub message_id: String,
    /// GrpHdr/NbOfTxs.
    pub declared_transactions: usize,
    /// GrpHdr/CtrlSum.
    pub declared_control_sum: Decimal,
    pub creditor_name: String,
    pub creditor_id: String,
    pub batches: Vec<BatchSummary>,
}

/// One PmtInf block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub payment_info_id: String,
    pub sequence_type: String,
    pub collection_date: Option<NaiveDate>,
    pub declared_transactions: usize,
    pub declared_control_sum: Decimal,
    pub transactions: Vec<TransactionSummary>,
}

/// One DrctDbtTxInf.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionSummary {
    pub end_to_end_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub mandate_id: String,
    pub mandate_date: Option<NaiveDate>,
    pub debtor_name: String,
    pub debtor_iban: String,
    pub debtor_bic: String,
    pub remittance: String,
}

impl Pain008Summary {
    /// All transactions across batches, in document order.
    pub fn transactions(&self) -> impl Iterator<Item = &TransactionSummary> {
        self.batches.iter().flat_map(|b| b.transactions.iter())
    }

    /// Sum of all InstdAmt values.
    pub fn amount_total(&self) -> Decimal {
        self.transactions().map(|t| t.amount).sum()
    }
}

/// Read a pain.008.001.02 document back into a [`Pain008Summary`].
///
/// Only well-formedness and the fields listed in the summary are checked;
/// unknown elements are skipped.
pub fn read_pain008(xml: &str) -> Result<Pain008Summary, EinzugError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut summary = Pain008Summary::default();
    let mut path: Vec<String> = Vec::new();
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = std::str::from_utf8(e.local_name().as_ref())
                    .unwrap_or("")
                    .to_string();
                if path.is_empty() {
                    if name != "Document" {
                        return Err(EinzugError::Xml(format!(
                            "expected <Document> root, found <{name}>"
                        )));
                    }
                    saw_root = true;
                }
                match name.as_str() {
                    "PmtInf" => summary.batches.push(BatchSummary::default()),
                    "DrctDbtTxInf" => {
                        if let Some(batch) = summary.batches.last_mut() {
                            batch.transactions.push(TransactionSummary::default());
                        }
                    }
                    "InstdAmt" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"Ccy" {
                                let val = std::str::from_utf8(&attr.value).unwrap_or("");
                                if let Some(tx) = current_tx(&mut summary) {
                                    tx.currency = val.to_string();
                                }
                            }
                        }
                    }
                    _ => {}
                }
                path.push(name);
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| EinzugError::Xml(format!("bad text content: {err}")))?
                    .to_string();
                if !text.is_empty() {
                    summary.handle_text(&path, &text)?;
                }
            }
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(EinzugError::Xml(format!(
                    "parse error at position {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    if !saw_root {
        return Err(EinzugError::Xml("document is empty".into()));
    }
    if !path.is_empty() {
        return Err(EinzugError::Xml(format!("unclosed element <{}>", path.join("/"))));
    }
    Ok(summary)
}

fn current_tx(summary: &mut Pain008Summary) -> Option<&mut TransactionSummary> {
    summary
        .batches
        .last_mut()
        .and_then(|b| b.transactions.last_mut())
}

fn parse_decimal(text: &str, element: &str) -> Result<Decimal, EinzugError> {
    Decimal::from_str(text)
        .map_err(|e| EinzugError::Xml(format!("{element} '{text}' is not a decimal: {e}")))
}

fn parse_count(text: &str) -> Result<usize, EinzugError> {
    text.parse()
        .map_err(|e| EinzugError::Xml(format!("NbOfTxs '{text}' is not a count: {e}")))
}

fn parse_date(text: &str, element: &str) -> Result<NaiveDate, EinzugError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| EinzugError::Xml(format!("{element} '{text}' is not a date: {e}")))
}

impl Pain008Summary {
    fn handle_text(&mut self, path: &[String], text: &str) -> Result<(), EinzugError> {
        let p: Vec<&str> = path.iter().map(String::as_str).collect();
        // path[0] = Document, path[1] = CstmrDrctDbtInitn
        let rest = p.get(2..).unwrap_or(&[]);

        match rest {
            ["GrpHdr", "MsgId"] => self.message_id = text.to_string(),
            ["GrpHdr", "NbOfTxs"] => self.declared_transactions = parse_count(text)?,
            ["GrpHdr", "CtrlSum"] => self.declared_control_sum = parse_decimal(text, "CtrlSum")?,
            ["PmtInf", inner @ ..] => self.handle_batch_text(inner, text)?,
            _ => {}
        }
        Ok(())
    }

    fn handle_batch_text(&mut self, p: &[&str], text: &str) -> Result<(), EinzugError> {
        if let ["Cdtr", "Nm"] = p {
            self.creditor_name = text.to_string();
            return Ok(());
        }
        if let ["CdtrSchmeId", "Id", "PrvtId", "Othr", "Id"] = p {
            self.creditor_id = text.to_string();
            return Ok(());
        }

        let Some(batch) = self.batches.last_mut() else {
            return Ok(());
        };
        match p {
            ["PmtInfId"] => batch.payment_info_id = text.to_string(),
            ["NbOfTxs"] => batch.declared_transactions = parse_count(text)?,
            ["CtrlSum"] => batch.declared_control_sum = parse_decimal(text, "CtrlSum")?,
            ["PmtTpInf", "SeqTp"] => batch.sequence_type = text.to_string(),
            ["ReqdColltnDt"] => batch.collection_date = Some(parse_date(text, "ReqdColltnDt")?),
            ["DrctDbtTxInf", inner @ ..] => {
                let Some(tx) = batch.transactions.last_mut() else {
                    return Ok(());
                };
                match inner {
                    ["PmtId", "EndToEndId"] => tx.end_to_end_id = text.to_string(),
                    ["InstdAmt"] => tx.amount = parse_decimal(text, "InstdAmt")?,
                    ["DrctDbtTx", "MndtRltdInf", "MndtId"] => tx.mandate_id = text.to_string(),
                    ["DrctDbtTx", "MndtRltdInf", "DtOfSgntr"] => {
                        tx.mandate_date = Some(parse_date(text, "DtOfSgntr")?)
                    }
                    ["DbtrAgt", "FinInstnId", "BIC"] => tx.debtor_bic = text.to_string(),
                    ["Dbtr", "Nm"] => tx.debtor_name = text.to_string(),
                    ["DbtrAcct", "Id", "IBAN"] => tx.debtor_iban = text.to_string(),
                    ["RmtInf", "Ustrd"] => tx.remittance = text.to_string(),
                    _ => {}
                }
            }
            _ => {}
        }
        Ok(())
    }
}
