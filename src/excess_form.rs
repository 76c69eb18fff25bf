//! 過大荷物の対話入力
//!
//! コマンドライン引数で渡されなかった項目だけを聞く。

use crate::error::{AppError, Result};
use dialoguer::{Input, Select};
use warehouse_scan_common::{ExcessRecordBuilder, ShipmentType};

/// 引数で渡された値
#[derive(Debug, Clone, Default)]
pub struct ExcessArgs {
    pub shipment_type: Option<ShipmentType>,
    pub weight: Option<f64>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// 引数の値を反映
pub fn apply_args(mut builder: ExcessRecordBuilder, args: &ExcessArgs) -> ExcessRecordBuilder {
    if let Some(t) = args.shipment_type {
        builder = builder.shipment_type(t);
    }
    if let Some(v) = args.weight {
        builder = builder.weight(v);
    }
    if let Some(v) = args.length {
        builder = builder.length(v);
    }
    if let Some(v) = args.width {
        builder = builder.width(v);
    }
    if let Some(v) = args.height {
        builder = builder.height(v);
    }
    builder
}

/// 未入力の項目を順に聞く
pub fn prompt_missing(mut builder: ExcessRecordBuilder) -> Result<ExcessRecordBuilder> {
    for field in builder.missing_fields() {
        builder = match field {
            "shipment_type" => builder.shipment_type(prompt_shipment_type()?),
            "weight" => builder.weight(prompt_positive("重量 (kg)")?),
            "length" => builder.length(prompt_positive("長さ (cm)")?),
            "width" => builder.width(prompt_positive("幅 (cm)")?),
            "height" => builder.height(prompt_positive("高さ (cm)")?),
            _ => builder,
        };
    }
    Ok(builder)
}

fn prompt_shipment_type() -> Result<ShipmentType> {
    let choices = [ShipmentType::Delivery, ShipmentType::Booking];
    let selected = Select::new()
        .with_prompt("出荷区分")
        .items(&choices)
        .default(0)
        .interact()
        .map_err(|e| AppError::CliExecution(e.to_string()))?;
    Ok(choices[selected])
}

fn prompt_positive(prompt: &str) -> Result<f64> {
    Input::<f64>::new()
        .with_prompt(prompt)
        .validate_with(|v: &f64| -> std::result::Result<(), &str> {
            if v.is_finite() && *v > 0.0 {
                Ok(())
            } else {
                Err("0より大きい数値を入力してください")
            }
        })
        .interact_text()
        .map_err(|e| AppError::CliExecution(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use warehouse_scan_common::ExcessLookup;

    fn looked_up() -> ExcessRecordBuilder {
        ExcessRecordBuilder::new().with_lookup(ExcessLookup {
            barcode: "ABC123".into(),
            unit_count: "2".into(),
            customer: "Acme".into(),
        })
    }

    #[test]
    fn test_apply_args_complete() {
        let args = ExcessArgs {
            shipment_type: Some(ShipmentType::Delivery),
            weight: Some(10.0),
            length: Some(50.0),
            width: Some(40.0),
            height: Some(30.0),
        };
        let builder = apply_args(looked_up(), &args);
        assert!(builder.is_complete());
        assert_eq!(builder.build().unwrap().customer, "Acme");
    }

    #[test]
    fn test_apply_args_partial_leaves_missing() {
        let args = ExcessArgs {
            weight: Some(10.0),
            ..Default::default()
        };
        let builder = apply_args(looked_up(), &args);
        assert_eq!(
            builder.missing_fields(),
            vec!["shipment_type", "length", "width", "height"]
        );
    }
}
