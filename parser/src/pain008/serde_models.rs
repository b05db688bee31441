use serde::Serialize;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename = "Document")]
pub struct Pain008Document {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,

    #[serde(rename = "@xmlns:xsi")]
    pub xmlns_xsi: String,

    /// <CstmrDrctDbtInitn>...</CstmrDrctDbtInitn>
    #[serde(rename = "CstmrDrctDbtInitn")]
    pub initiation: Pain008Initiation,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Pain008Initiation {
    /// <GrpHdr>...</GrpHdr>
    #[serde(rename = "GrpHdr")]
    pub group_header: Pain008GroupHeader,

    /// Все <PmtInf>...</PmtInf>
    #[serde(rename = "PmtInf", default)]
    pub payments: Vec<Pain008PaymentInfo>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Pain008GroupHeader {
    /// <MsgId>f-20240115-...</MsgId>
    #[serde(rename = "MsgId")]
    pub message_id: String,

    /// <CreDtTm>2024-01-15T10:00:00</CreDtTm>
    #[serde(rename = "CreDtTm")]
    pub created_at: String,

    #[serde(rename = "NbOfTxs")]
    pub transaction_count: usize,

    /// <CtrlSum>167.92</CtrlSum>
    #[serde(rename = "CtrlSum")]
    pub control_sum: String,

    #[serde(rename = "InitgPty")]
    pub initiating_party: PainParty,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Pain008PaymentInfo {
    #[serde(rename = "PmtInfId")]
    pub id: String,

    /// всегда DD
    #[serde(rename = "PmtMtd")]
    pub method: String,

    #[serde(rename = "NbOfTxs")]
    pub transaction_count: usize,

    #[serde(rename = "CtrlSum")]
    pub control_sum: String,

    #[serde(rename = "PmtTpInf")]
    pub payment_type: PainPaymentType,

    /// <ReqdColltnDt>2024-02-01</ReqdColltnDt>
    #[serde(rename = "ReqdColltnDt")]
    pub collection_date: String,

    #[serde(rename = "Cdtr")]
    pub creditor: PainParty,

    #[serde(rename = "CdtrAcct")]
    pub creditor_account: PainAccount,

    #[serde(rename = "CdtrAgt")]
    pub creditor_agent: PainAgent,

    /// всегда SLEV
    #[serde(rename = "ChrgBr")]
    pub charge_bearer: String,

    #[serde(rename = "CdtrSchmeId")]
    pub creditor_scheme_id: PainSchemeId,

    /// Все <DrctDbtTxInf>...</DrctDbtTxInf>
    #[serde(rename = "DrctDbtTxInf", default)]
    pub transactions: Vec<Pain008Transaction>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PainPaymentType {
    /// <SvcLvl><Cd>SEPA</Cd></SvcLvl>
    #[serde(rename = "SvcLvl")]
    pub service_level: PainCode,

    /// <LclInstrm><Cd>CORE</Cd></LclInstrm>
    #[serde(rename = "LclInstrm")]
    pub local_instrument: PainCode,

    /// FRST, RCUR, OOFF, FNAL
    #[serde(rename = "SeqTp")]
    pub sequence_type: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PainCode {
    #[serde(rename = "Cd")]
    pub code: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Pain008Transaction {
    #[serde(rename = "PmtId")]
    pub payment_id: PainPaymentId,

    #[serde(rename = "InstdAmt")]
    pub amount: PainAmount,

    #[serde(rename = "DrctDbtTx")]
    pub direct_debit: PainDirectDebit,

    #[serde(rename = "DbtrAgt")]
    pub debtor_agent: PainAgent,

    #[serde(rename = "Dbtr")]
    pub debtor: PainParty,

    #[serde(rename = "DbtrAcct")]
    pub debtor_account: PainAccount,

    #[serde(rename = "RmtInf", skip_serializing_if = "Option::is_none")]
    pub remittance: Option<PainRemittance>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PainPaymentId {
    #[serde(rename = "EndToEndId")]
    pub end_to_end_id: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PainAmount {
    /// Атрибут Ccy="EUR"
    #[serde(rename = "@Ccy")]
    pub currency: String,

    #[serde(rename = "$text")]
    pub value: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PainDirectDebit {
    #[serde(rename = "MndtRltdInf")]
    pub mandate: PainMandate,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PainMandate {
    #[serde(rename = "MndtId")]
    pub mandate_id: String,

    /// дата подписания мандата
    #[serde(rename = "DtOfSgntr")]
    pub signature_date: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PainRemittance {
    #[serde(rename = "Ustrd")]
    pub unstructured: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PainParty {
    /// <Nm>
    #[serde(rename = "Nm")]
    pub name: String,

    /// <PstlAdr>
    #[serde(rename = "PstlAdr", skip_serializing_if = "Option::is_none")]
    pub postal_address: Option<PainPostalAddress>,

    /// <Id>
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    pub id: Option<PainPartyId>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PainPostalAddress {
    #[serde(rename = "Ctry", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// не больше двух строк
    #[serde(rename = "AdrLine", default)]
    pub lines: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PainPartyId {
    /// <OrgId>
    #[serde(rename = "OrgId", skip_serializing_if = "Option::is_none")]
    pub organisation: Option<PainOtherId>,

    /// <PrvtId>
    #[serde(rename = "PrvtId", skip_serializing_if = "Option::is_none")]
    pub private: Option<PainOtherId>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PainOtherId {
    #[serde(rename = "Othr")]
    pub other: PainGenericId,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PainGenericId {
    #[serde(rename = "Id")]
    pub id: String,

    #[serde(rename = "SchmeNm", skip_serializing_if = "Option::is_none")]
    pub scheme_name: Option<PainProprietary>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PainProprietary {
    #[serde(rename = "Prtry")]
    pub proprietary: String,
}

/// <CdtrSchmeId><Id><PrvtId><Othr>...</Othr></PrvtId></Id></CdtrSchmeId>
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PainSchemeId {
    #[serde(rename = "Id")]
    pub id: PainPartyId,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PainAccount {
    #[serde(rename = "Id")]
    pub id: PainAccountId,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PainAccountId {
    #[serde(rename = "IBAN")]
    pub iban: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PainAgent {
    #[serde(rename = "FinInstnId")]
    pub institution: PainInstitution,
}

/// BIC или, если банк неизвестен, <Othr><Id>NOTPROVIDED</Id></Othr>
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PainInstitution {
    #[serde(rename = "BIC", skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,

    #[serde(rename = "Othr", skip_serializing_if = "Option::is_none")]
    pub other: Option<PainGenericId>,
}
