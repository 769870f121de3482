//! Stata XML dataset output generation.
//!
//! Serializes the finalized fieldmap, label registry, recoded matrix, and
//! type table in the fixed section order the format requires: header,
//! type list, name list, format list, label-set references, variable
//! labels, data rows, label-set bodies. No inference or recoding happens
//! here; an inconsistency between columns and the label registry is a
//! contract violation surfaced as [`ExportError::MissingLabelSet`].

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use svy_model::{ExportError, MAX_STRING_WIDTH, ResponseMatrix, SurveyDefinition, TypeTable};
use svy_transform::FieldMap;

use crate::common::{
    BYTE_ORDER, DS_FORMAT, FILE_TYPE, header_timestamp, truncate_to_bytes, write_text_element,
    write_varname_element,
};

/// Write the dataset document to a file, creating parent directories.
pub fn write_dataset_file(
    output_path: &Path,
    survey: &SurveyDefinition,
    fieldmap: &FieldMap,
    matrix: &ResponseMatrix,
    types: &TypeTable,
) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
    }
    let file =
        File::create(output_path).with_context(|| format!("create {}", output_path.display()))?;
    write_dataset(BufWriter::new(file), survey, fieldmap, matrix, types)
}

/// Write the dataset document to an open sink.
pub fn write_dataset<W: Write>(
    sink: W,
    survey: &SurveyDefinition,
    fieldmap: &FieldMap,
    matrix: &ResponseMatrix,
    types: &TypeTable,
) -> Result<()> {
    // Columns referencing a label set the registry never created indicate a
    // broken construction phase; fail before emitting anything.
    for column in &fieldmap.columns {
        if let Some(name) = column.label_set.as_ref() {
            if !fieldmap.label_sets.contains_key(name) {
                return Err(ExportError::MissingLabelSet {
                    column: column.name.clone(),
                    name: name.clone(),
                }
                .into());
            }
        }
    }

    let mut xml = Writer::new_with_indent(sink, b' ', 2);
    xml.write_event(Event::Start(BytesStart::new("dta")))?;

    write_header(&mut xml, survey, fieldmap, matrix)?;
    write_descriptors(&mut xml, fieldmap, types)?;
    write_variable_labels(&mut xml, fieldmap)?;
    write_data(&mut xml, fieldmap, matrix, types)?;
    write_value_labels(&mut xml, fieldmap)?;

    xml.write_event(Event::End(BytesEnd::new("dta")))?;
    Ok(())
}

fn write_header<W: Write>(
    xml: &mut Writer<W>,
    survey: &SurveyDefinition,
    fieldmap: &FieldMap,
    matrix: &ResponseMatrix,
) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new("header")))?;
    write_text_element(xml, "ds_format", DS_FORMAT)?;
    write_text_element(xml, "byteorder", BYTE_ORDER)?;
    write_text_element(xml, "filetype", FILE_TYPE)?;
    write_text_element(xml, "nvar", &fieldmap.columns.len().to_string())?;
    write_text_element(xml, "nobs", &matrix.len().to_string())?;
    let data_label = format!("{} (SID: {})", survey.title, survey.survey_id);
    write_text_element(xml, "data_label", &data_label)?;
    write_text_element(xml, "time_stamp", &header_timestamp(Utc::now()))?;
    xml.write_event(Event::End(BytesEnd::new("header")))?;
    Ok(())
}

fn write_descriptors<W: Write>(
    xml: &mut Writer<W>,
    fieldmap: &FieldMap,
    types: &TypeTable,
) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new("descriptors")))?;

    xml.write_event(Event::Start(BytesStart::new("typelist")))?;
    for column in &fieldmap.columns {
        let token = types
            .get(&column.key)
            .map(|column_type| column_type.storage.token())
            .unwrap_or_else(|| "str1".to_string());
        write_varname_element(xml, "type", &column.name, &token)?;
    }
    xml.write_event(Event::End(BytesEnd::new("typelist")))?;

    xml.write_event(Event::Start(BytesStart::new("varnamelist")))?;
    for column in &fieldmap.columns {
        write_text_element(xml, "varname", &column.name)?;
    }
    xml.write_event(Event::End(BytesEnd::new("varnamelist")))?;

    xml.write_event(Event::Start(BytesStart::new("fmtlist")))?;
    for column in &fieldmap.columns {
        let format = types
            .get(&column.key)
            .map(|column_type| column_type.format.clone())
            .unwrap_or_else(|| "%1s".to_string());
        write_varname_element(xml, "fmt", &column.name, &format)?;
    }
    xml.write_event(Event::End(BytesEnd::new("fmtlist")))?;

    xml.write_event(Event::Start(BytesStart::new("lbllist")))?;
    for column in &fieldmap.columns {
        if let Some(name) = column.label_set.as_ref() {
            write_varname_element(xml, "lblname", &column.name, name)?;
        }
    }
    xml.write_event(Event::End(BytesEnd::new("lbllist")))?;

    xml.write_event(Event::End(BytesEnd::new("descriptors")))?;
    Ok(())
}

fn write_variable_labels<W: Write>(xml: &mut Writer<W>, fieldmap: &FieldMap) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new("variable_labels")))?;
    for column in &fieldmap.columns {
        write_varname_element(xml, "vlabel", &column.name, &column.label)?;
    }
    xml.write_event(Event::End(BytesEnd::new("variable_labels")))?;
    Ok(())
}

fn write_data<W: Write>(
    xml: &mut Writer<W>,
    fieldmap: &FieldMap,
    matrix: &ResponseMatrix,
    types: &TypeTable,
) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new("data")))?;
    for (row_idx, row) in matrix.rows().iter().enumerate() {
        let mut record = BytesStart::new("o");
        let num = (row_idx + 1).to_string();
        record.push_attribute(("num", num.as_str()));
        xml.write_event(Event::Start(record))?;
        for (col_idx, column) in fieldmap.columns.iter().enumerate() {
            let value = row.get(col_idx).map(String::as_str).unwrap_or("");
            // String storage is byte-capped; truncation happens here and
            // nowhere earlier.
            let emitted = if types.get(&column.key).is_some_and(|t| t.storage.is_string()) {
                truncate_to_bytes(value, MAX_STRING_WIDTH as usize)
            } else {
                value
            };
            let mut node = BytesStart::new("v");
            node.push_attribute(("varname", column.name.as_str()));
            xml.write_event(Event::Start(node))?;
            xml.write_event(Event::Text(BytesText::new(emitted)))?;
            xml.write_event(Event::End(BytesEnd::new("v")))?;
        }
        xml.write_event(Event::End(BytesEnd::new("o")))?;
    }
    xml.write_event(Event::End(BytesEnd::new("data")))?;
    Ok(())
}

fn write_value_labels<W: Write>(xml: &mut Writer<W>, fieldmap: &FieldMap) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new("value_labels")))?;
    for (name, set) in &fieldmap.label_sets {
        let mut node = BytesStart::new("vallab");
        node.push_attribute(("name", name.as_str()));
        xml.write_event(Event::Start(node))?;
        for (code, text) in set.entries() {
            let mut entry = BytesStart::new("label");
            let value = code.to_string();
            entry.push_attribute(("value", value.as_str()));
            xml.write_event(Event::Start(entry))?;
            xml.write_event(Event::Text(BytesText::new(text)))?;
            xml.write_event(Event::End(BytesEnd::new("label")))?;
        }
        xml.write_event(Event::End(BytesEnd::new("vallab")))?;
    }
    xml.write_event(Event::End(BytesEnd::new("value_labels")))?;
    Ok(())
}
