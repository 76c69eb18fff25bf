//! 過大荷物（エクセソ）記録
//!
//! 1. バーコードからシートの個数・顧客を引く（A列=コード, B列=個数, C列=顧客）
//! 2. 重量と寸法を入力
//!
//! 両方そろった時点で送信用のレコードを組み立てる。照合は完全一致のみで、
//! 1行目はヘッダーとして飛ばす。

use crate::error::{Error, Result};
use crate::store::TabularStore;
use serde::{Deserialize, Serialize};

const CODE_COLUMN: usize = 0;
const UNITS_COLUMN: usize = 1;
const CUSTOMER_COLUMN: usize = 2;

/// 送信先が受け付ける action 値
pub const SUBMIT_ACTION: &str = "addExceso";

/// 出荷区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShipmentType {
    Delivery,
    Booking,
}

impl ShipmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentType::Delivery => "DELIVERY",
            ShipmentType::Booking => "BOOKING",
        }
    }
}

impl std::str::FromStr for ShipmentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "delivery" | "d" => Ok(ShipmentType::Delivery),
            "booking" | "b" => Ok(ShipmentType::Booking),
            _ => Err(format!("Unknown shipment type: {}. Use delivery or booking", s)),
        }
    }
}

impl std::fmt::Display for ShipmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ステップ1の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcessLookup {
    pub barcode: String,
    pub unit_count: String,
    pub customer: String,
}

/// バーコードから個数と顧客を引く
pub fn lookup_excess(barcode: &str, store: &TabularStore) -> Option<ExcessLookup> {
    let needle = barcode.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let row = store.rows().iter().skip(1).find(|row| {
        row.get(CODE_COLUMN)
            .map(|cell| cell.to_lowercase().split(',').any(|c| c.trim() == needle))
            .unwrap_or(false)
    })?;

    Some(ExcessLookup {
        barcode: barcode.trim().to_string(),
        unit_count: row.get(UNITS_COLUMN).unwrap_or_default().trim().to_string(),
        customer: row.get(CUSTOMER_COLUMN).unwrap_or_default().trim().to_string(),
    })
}

/// 送信用レコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcessRecord {
    pub barcode: String,
    pub unit_count: String,
    pub customer: String,
    pub shipment_type: ShipmentType,
    /// kg
    pub weight: f64,
    /// cm
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl ExcessRecord {
    /// フォーム送信用のフィールド（送信先の項目名）
    pub fn to_form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("action", SUBMIT_ACTION.to_string()),
            ("barcode", self.barcode.clone()),
            ("pcs", self.unit_count.clone()),
            ("customer", self.customer.clone()),
            ("tipo", self.shipment_type.as_str().to_string()),
            ("peso", self.weight.to_string()),
            ("largo", self.length.to_string()),
            ("ancho", self.width.to_string()),
            ("alto", self.height.to_string()),
        ]
    }
}

/// 2ステップ入力の組み立て
#[derive(Debug, Clone, Default)]
pub struct ExcessRecordBuilder {
    lookup: Option<ExcessLookup>,
    shipment_type: Option<ShipmentType>,
    weight: Option<f64>,
    length: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
}

impl ExcessRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// ステップ1: シートを引いて結果を保持。見つからなければ false
    pub fn lookup(&mut self, barcode: &str, store: &TabularStore) -> bool {
        self.lookup = lookup_excess(barcode, store);
        self.lookup.is_some()
    }

    pub fn with_lookup(mut self, lookup: ExcessLookup) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn looked_up(&self) -> Option<&ExcessLookup> {
        self.lookup.as_ref()
    }

    pub fn shipment_type(mut self, value: ShipmentType) -> Self {
        self.shipment_type = Some(value);
        self
    }

    pub fn weight(mut self, value: f64) -> Self {
        self.weight = Some(value);
        self
    }

    pub fn length(mut self, value: f64) -> Self {
        self.length = Some(value);
        self
    }

    pub fn width(mut self, value: f64) -> Self {
        self.width = Some(value);
        self
    }

    pub fn height(mut self, value: f64) -> Self {
        self.height = Some(value);
        self
    }

    /// 未入力の項目名（入力順）
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.lookup.is_none() {
            missing.push("barcode");
        }
        if self.shipment_type.is_none() {
            missing.push("shipment_type");
        }
        for (name, value) in self.dimensions() {
            if value.is_none() {
                missing.push(name);
            }
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// レコードを組み立てる
    ///
    /// 未入力があれば `IncompleteRecord`、0以下や非数は `InvalidDimension`。
    pub fn build(&self) -> Result<ExcessRecord> {
        if let Some(first) = self.missing_fields().first() {
            return Err(Error::IncompleteRecord(*first));
        }
        for (name, value) in self.dimensions() {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(Error::InvalidDimension(name));
                }
            }
        }

        let lookup = self.lookup.clone().ok_or(Error::IncompleteRecord("barcode"))?;
        Ok(ExcessRecord {
            barcode: lookup.barcode,
            unit_count: lookup.unit_count,
            customer: lookup.customer,
            shipment_type: self.shipment_type.ok_or(Error::IncompleteRecord("shipment_type"))?,
            weight: self.weight.ok_or(Error::IncompleteRecord("weight"))?,
            length: self.length.ok_or(Error::IncompleteRecord("length"))?,
            width: self.width.ok_or(Error::IncompleteRecord("width"))?,
            height: self.height.ok_or(Error::IncompleteRecord("height"))?,
        })
    }

    fn dimensions(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("weight", self.weight),
            ("length", self.length),
            ("width", self.width),
            ("height", self.height),
        ]
    }
}

/// 送信先のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl SubmissionResponse {
    /// JSONとしてパース（JSON以外はエラー、再試行はしない）
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text.trim())?)
    }

    /// 失敗時の表示用メッセージ
    pub fn failure_reason(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "unknown error".to_string())
    }
}
