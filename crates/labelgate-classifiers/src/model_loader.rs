//! Sequence-classification models loaded from the Hugging Face Hub with Candle

use crate::config::{DeviceSpec, ProviderSettings};
use candle_core::{DType, Device, IndexOp, Tensor, D};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
use candle_transformers::models::xlm_roberta::{
    Config as XlmRobertaConfig, XLMRobertaForSequenceClassification,
};
use hf_hub::api::sync::ApiBuilder;
use hf_hub::{Repo, RepoType};
use labelgate_core::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokenizers::{Tokenizer, TruncationParams};

/// Top-ranked class for one input
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub score: f32,
}

/// Local files making up one model snapshot
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}

/// Fields of `config.json` needed before picking an architecture
#[derive(Debug, Deserialize)]
struct ModelHeader {
    model_type: String,
    #[serde(default)]
    id2label: HashMap<String, String>,
    #[serde(default)]
    num_labels: Option<usize>,
}

impl ModelHeader {
    fn num_labels(&self) -> usize {
        if !self.id2label.is_empty() {
            self.id2label.len()
        } else {
            self.num_labels.unwrap_or(2)
        }
    }

    /// Labels ordered by class index
    fn labels(&self) -> Vec<String> {
        (0..self.num_labels())
            .map(|idx| {
                self.id2label
                    .get(&idx.to_string())
                    .cloned()
                    .unwrap_or_else(|| format!("LABEL_{}", idx))
            })
            .collect()
    }
}

enum SequenceModel {
    Bert {
        encoder: BertModel,
        pooler: Option<Linear>,
        classifier: Linear,
    },
    DistilBert {
        encoder: DistilBertModel,
        pre_classifier: Option<Linear>,
        classifier: Linear,
    },
    XlmRoberta(XLMRobertaForSequenceClassification),
}

/// A tokenizer plus encoder plus classification head, ready for inference
pub struct SequenceClassifier {
    model: SequenceModel,
    tokenizer: Tokenizer,
    device: Device,
    labels: Vec<String>,
    architecture: String,
}

impl SequenceClassifier {
    /// Download (or reuse the cached copy of) the configured repository and
    /// build the model. Blocking: call from a blocking thread.
    pub fn load(settings: &ProviderSettings, token: Option<String>) -> Result<Self> {
        let files = fetch_model_files(settings, token)?;
        Self::from_files(&files, settings.device, settings.max_length)
    }

    /// Build the model from files already on disk
    pub fn from_files(files: &ModelFiles, device: DeviceSpec, max_length: usize) -> Result<Self> {
        let config_str = std::fs::read_to_string(&files.config)?;
        let header: ModelHeader = serde_json::from_str(&config_str)?;
        let labels = header.labels();
        let num_labels = labels.len();

        let device = create_device(device)?;
        let mut tokenizer = load_tokenizer(&files.tokenizer)?;
        limit_length(&mut tokenizer, max_length)?;
        let vb = load_var_builder(&files.weights, &device)?;

        let model = match header.model_type.as_str() {
            "bert" => load_bert(&vb, &config_str, num_labels)?,
            "distilbert" => load_distilbert(&vb, &config_str, num_labels)?,
            "roberta" | "xlm-roberta" => {
                let config: XlmRobertaConfig = serde_json::from_str(&config_str)?;
                let model = XLMRobertaForSequenceClassification::new(num_labels, &config, vb)
                    .map_err(model_error("Failed to load XLM-RoBERTa model"))?;
                SequenceModel::XlmRoberta(model)
            }
            other => {
                return Err(Error::model(format!(
                    "Unsupported model_type '{}' (expected bert, distilbert, roberta or xlm-roberta)",
                    other
                )))
            }
        };

        tracing::info!(
            architecture = %header.model_type,
            labels = ?labels,
            "Loaded sequence classifier"
        );

        Ok(Self {
            model,
            tokenizer,
            device,
            labels,
            architecture: header.model_type,
        })
    }

    /// Labels ordered by class index
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// `model_type` from the model configuration
    pub fn architecture(&self) -> &str {
        &self.architecture
    }

    /// Run one forward pass and return the most probable class
    pub fn predict(&self, text: &str) -> Result<Prediction> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::model(format!("Tokenization failed: {}", e)))?;

        let input_ids = self.batch(encoding.get_ids(), "input ids")?;

        let logits = match &self.model {
            SequenceModel::Bert {
                encoder,
                pooler,
                classifier,
            } => {
                let token_type_ids = self.batch(encoding.get_type_ids(), "token type ids")?;
                let hidden_states = encoder
                    .forward(&input_ids, &token_type_ids, None)
                    .map_err(model_error("Model forward pass failed"))?;

                let mut pooled = cls_embedding(&hidden_states)?;
                if let Some(pooler) = pooler {
                    pooled = pooler
                        .forward(&pooled)
                        .and_then(|t| t.tanh())
                        .map_err(model_error("Pooler failed"))?;
                }

                classifier
                    .forward(&pooled)
                    .map_err(model_error("Classification head failed"))?
            }
            SequenceModel::DistilBert {
                encoder,
                pre_classifier,
                classifier,
            } => {
                // DistilBERT masks positions where the mask is 1.
                let inverted: Vec<u8> = encoding
                    .get_attention_mask()
                    .iter()
                    .map(|&x| u8::from(x == 0))
                    .collect();
                let mask = Tensor::new(inverted.as_slice(), &self.device)
                    .and_then(|t| t.unsqueeze(0))
                    .map_err(model_error("Failed to create attention mask"))?;

                let hidden_states = encoder
                    .forward(&input_ids, &mask)
                    .map_err(model_error("Model forward pass failed"))?;

                let mut pooled = cls_embedding(&hidden_states)?;
                if let Some(pre_classifier) = pre_classifier {
                    pooled = pre_classifier
                        .forward(&pooled)
                        .and_then(|t| t.relu())
                        .map_err(model_error("Pre-classifier failed"))?;
                }

                classifier
                    .forward(&pooled)
                    .map_err(model_error("Classification head failed"))?
            }
            SequenceModel::XlmRoberta(model) => {
                let attention_mask = self.batch(encoding.get_attention_mask(), "attention mask")?;
                let token_type_ids = self.batch(encoding.get_type_ids(), "token type ids")?;

                model
                    .forward(&input_ids, &attention_mask, &token_type_ids)
                    .map_err(model_error("Model forward pass failed"))?
            }
        };

        let probs = to_probabilities(&logits)?;
        Ok(top_prediction(&self.labels, &probs))
    }

    fn batch(&self, values: &[u32], what: &str) -> Result<Tensor> {
        Tensor::new(values, &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::model(format!("Failed to create {} tensor: {}", what, e)))
    }
}

/// Fetch config, tokenizer and weights for the configured repository
pub fn fetch_model_files(settings: &ProviderSettings, token: Option<String>) -> Result<ModelFiles> {
    tracing::info!(
        model = %settings.model,
        revision = %settings.revision,
        "Fetching model from the Hugging Face Hub"
    );

    let api = ApiBuilder::new()
        .with_token(token)
        .build()
        .map_err(|e| Error::model(format!("Failed to initialize HuggingFace API: {}", e)))?;

    let repo = api.repo(Repo::with_revision(
        settings.model.clone(),
        RepoType::Model,
        settings.revision.clone(),
    ));

    let fetch = |file: &str| {
        repo.get(file)
            .map_err(|e| Error::model(format!("Failed to download {}: {}", file, e)))
    };

    let config = fetch("config.json")?;
    let weights = fetch("model.safetensors")?;
    let tokenizer = fetch("tokenizer.json").or_else(|_| fetch("vocab.txt"))?;

    tracing::debug!(path = %weights.display(), "Model weights available");

    Ok(ModelFiles {
        config,
        tokenizer,
        weights,
    })
}

fn model_error(context: &'static str) -> impl Fn(candle_core::Error) -> Error {
    move |e| Error::model(format!("{}: {}", context, e))
}

fn create_device(device: DeviceSpec) -> Result<Device> {
    match device {
        DeviceSpec::Cpu => Ok(Device::Cpu),
        DeviceSpec::Cuda => Device::new_cuda(0).map_err(model_error("Failed to initialize CUDA")),
        DeviceSpec::Metal => {
            Device::new_metal(0).map_err(model_error("Failed to initialize Metal"))
        }
    }
}

fn load_var_builder(weights: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    // Safety: the safetensors file is memory-mapped read-only and not
    // modified while the model is alive.
    unsafe {
        VarBuilder::from_mmaped_safetensors(&[weights.to_path_buf()], DType::F32, device)
            .map_err(model_error("Failed to load weights"))
    }
}

fn load_tokenizer(path: &Path) -> Result<Tokenizer> {
    let is_vocab = path
        .file_name()
        .is_some_and(|name| name == "vocab.txt");

    if !is_vocab {
        return Tokenizer::from_file(path)
            .map_err(|e| Error::model(format!("Failed to load tokenizer.json: {}", e)));
    }

    tracing::debug!("Building WordPiece tokenizer from vocab.txt");

    use tokenizers::models::wordpiece::WordPiece;
    use tokenizers::normalizers::BertNormalizer;
    use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
    use tokenizers::processors::bert::BertProcessing;

    let wordpiece = WordPiece::from_file(path.to_string_lossy().as_ref())
        .unk_token("[UNK]".to_string())
        .build()
        .map_err(|e| Error::model(format!("Failed to build WordPiece model: {}", e)))?;

    let mut tokenizer = Tokenizer::new(wordpiece);
    tokenizer.with_normalizer(Some(BertNormalizer::default()));
    tokenizer.with_pre_tokenizer(Some(BertPreTokenizer));
    tokenizer.with_post_processor(Some(BertProcessing::new(
        ("[SEP]".to_string(), 102),
        ("[CLS]".to_string(), 101),
    )));

    Ok(tokenizer)
}

/// Truncate inputs to `max_length` tokens, special tokens included
fn limit_length(tokenizer: &mut Tokenizer, max_length: usize) -> Result<()> {
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            ..Default::default()
        }))
        .map_err(|e| Error::model(format!("Failed to configure truncation: {}", e)))?;
    Ok(())
}

fn load_bert(vb: &VarBuilder, config_str: &str, num_labels: usize) -> Result<SequenceModel> {
    let config: BertConfig = serde_json::from_str(config_str)?;

    // Fine-tuned checkpoints nest the encoder under `bert.`; bare exports
    // keep it at the root.
    let (encoder, prefix) = ["bert", ""]
        .iter()
        .find_map(|prefix| {
            let vb_prefix = if prefix.is_empty() {
                vb.clone()
            } else {
                vb.pp(*prefix)
            };
            BertModel::load(vb_prefix, &config)
                .ok()
                .map(|model| (model, *prefix))
        })
        .ok_or_else(|| Error::model("Failed to load BERT encoder (tried 'bert' and <root>)"))?;

    let pooler_vb = if prefix.is_empty() {
        vb.pp("pooler.dense")
    } else {
        vb.pp(prefix).pp("pooler.dense")
    };
    let pooler = candle_nn::linear(config.hidden_size, config.hidden_size, pooler_vb).ok();

    let classifier = candle_nn::linear(config.hidden_size, num_labels, vb.pp("classifier"))
        .map_err(model_error("Failed to load classification head"))?;

    Ok(SequenceModel::Bert {
        encoder,
        pooler,
        classifier,
    })
}

fn load_distilbert(vb: &VarBuilder, config_str: &str, num_labels: usize) -> Result<SequenceModel> {
    let config: DistilBertConfig = serde_json::from_str(config_str)?;
    let raw: serde_json::Value = serde_json::from_str(config_str)?;
    let hidden_size = raw
        .get("dim")
        .or_else(|| raw.get("hidden_size"))
        .and_then(|v| v.as_u64())
        .unwrap_or(768) as usize;

    let encoder = DistilBertModel::load(vb.pp("distilbert"), &config)
        .map_err(model_error("Failed to load DistilBERT model"))?;

    let pre_classifier = candle_nn::linear(hidden_size, hidden_size, vb.pp("pre_classifier")).ok();
    let classifier = candle_nn::linear(hidden_size, num_labels, vb.pp("classifier"))
        .map_err(model_error("Failed to load classification head"))?;

    Ok(SequenceModel::DistilBert {
        encoder,
        pre_classifier,
        classifier,
    })
}

fn cls_embedding(hidden_states: &Tensor) -> Result<Tensor> {
    hidden_states
        .i((0, 0, ..))
        .and_then(|t| t.unsqueeze(0))
        .map_err(model_error("Failed to get CLS token"))
}

fn to_probabilities(logits: &Tensor) -> Result<Vec<f32>> {
    candle_nn::ops::softmax(logits, D::Minus1)
        .and_then(|t| t.squeeze(0))
        .and_then(|t| t.to_vec1::<f32>())
        .map_err(model_error("Softmax failed"))
}

fn top_prediction(labels: &[String], probs: &[f32]) -> Prediction {
    let (idx, score) = probs
        .iter()
        .copied()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or((0, 0.0));

    let label = labels
        .get(idx)
        .cloned()
        .unwrap_or_else(|| format!("LABEL_{}", idx));

    Prediction { label, score }
}
