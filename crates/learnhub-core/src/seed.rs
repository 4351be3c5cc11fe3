//! # Seed Dataset
//!
//! The fixed content a fresh store starts with: 3 concepts, 2 theory
//! entries, 2 code implementations, 1 experiment and 3 papers.
//!
//! Seeding goes through the public `ContentStore` operations, so on an
//! empty store the seed rows receive ids 1..n in the order below and the
//! hard-coded `concept_id` references line up.

use crate::store::ContentStore;
use crate::types::{
    HubError, NewCodeImplementation, NewConcept, NewExperiment, NewPaper, NewTheoryContent,
    RecordId,
};
use serde_json::json;

/// Slug of the first seed concept (id 1).
pub const SEMI_SUPERVISED_SLUG: &str = "semi-supervised-learning";

/// Slug of the second seed concept (id 2).
pub const SELF_SUPERVISED_SLUG: &str = "self-supervised-learning";

/// Slug of the third seed concept (id 3).
pub const CONTRASTIVE_SLUG: &str = "contrastive-learning";

const SEMI_SUPERVISED_ID: RecordId = RecordId(1);
const SELF_SUPERVISED_ID: RecordId = RecordId(2);

const SEMI_SUPERVISED_THEORY: &str = include_str!("../seed/semi_supervised_theory.md");
const SELF_SUPERVISED_THEORY: &str = include_str!("../seed/self_supervised_theory.md");
const FIXMATCH_PY: &str = include_str!("../seed/fixmatch.py");
const MEAN_TEACHER_CPP: &str = include_str!("../seed/mean_teacher.cpp");
const FIXMATCH_SETUP: &str = include_str!("../seed/fixmatch_cifar10_setup.md");

/// Load the seed dataset into `store`.
pub fn load_into<S: ContentStore + ?Sized>(store: &mut S) -> Result<(), HubError> {
    for concept in concepts() {
        store.create_concept(concept)?;
    }
    for theory in theory_content() {
        store.create_theory_content(theory)?;
    }
    for code in code_implementations() {
        store.create_code_implementation(code)?;
    }
    for experiment in experiments() {
        store.create_experiment(experiment)?;
    }
    for paper in papers() {
        store.create_paper(paper)?;
    }
    Ok(())
}

fn concepts() -> Vec<NewConcept> {
    vec![
        NewConcept {
            slug: SEMI_SUPERVISED_SLUG.to_string(),
            title: "Semi-Supervised Learning".to_string(),
            description: Some(
                "Semi-supervised learning addresses the common scenario where labeled data is \
                 scarce but unlabeled data is abundant."
                    .to_string(),
            ),
            category: "semi-supervised".to_string(),
        },
        NewConcept {
            slug: SELF_SUPERVISED_SLUG.to_string(),
            title: "Self-Supervised Learning".to_string(),
            description: Some(
                "Learning from the data itself by creating artificial supervised tasks."
                    .to_string(),
            ),
            category: "self-supervised".to_string(),
        },
        NewConcept {
            slug: CONTRASTIVE_SLUG.to_string(),
            title: "Contrastive Learning".to_string(),
            description: Some("Learning by comparing similar and dissimilar examples.".to_string()),
            category: "self-supervised".to_string(),
        },
    ]
}

fn theory_content() -> Vec<NewTheoryContent> {
    vec![
        NewTheoryContent {
            concept_id: SEMI_SUPERVISED_ID,
            content: SEMI_SUPERVISED_THEORY.to_string(),
            references: Some(
                "Oliver, A., Odena, A., Raffel, C., Cubuk, E. D., & Goodfellow, I. J. (2018). \
                 Realistic Evaluation of Deep Semi-Supervised Learning Algorithms. NeurIPS."
                    .to_string(),
            ),
        },
        NewTheoryContent {
            concept_id: SELF_SUPERVISED_ID,
            content: SELF_SUPERVISED_THEORY.to_string(),
            references: Some(
                "Chen, T., Kornblith, S., Norouzi, M., & Hinton, G. (2020). A simple framework \
                 for contrastive learning of visual representations. ICML."
                    .to_string(),
            ),
        },
    ]
}

fn code_implementations() -> Vec<NewCodeImplementation> {
    vec![
        NewCodeImplementation {
            concept_id: SEMI_SUPERVISED_ID,
            title: "FixMatch Implementation".to_string(),
            language: "python".to_string(),
            code: FIXMATCH_PY.to_string(),
            description: Some(
                "This is a PyTorch implementation of FixMatch, a state-of-the-art \
                 semi-supervised learning algorithm that combines consistency regularization \
                 with pseudo-labeling. The implementation includes the main training loop and \
                 loss function."
                    .to_string(),
            ),
        },
        NewCodeImplementation {
            concept_id: SEMI_SUPERVISED_ID,
            title: "Mean Teacher in C++".to_string(),
            language: "cpp".to_string(),
            code: MEAN_TEACHER_CPP.to_string(),
            description: Some(
                "This C++ implementation of Mean Teacher uses PyTorch C++ API. Mean Teacher is \
                 a semi-supervised learning method that uses an exponential moving average of \
                 model weights to create a teacher model that provides consistent targets."
                    .to_string(),
            ),
        },
    ]
}

fn experiments() -> Vec<NewExperiment> {
    vec![NewExperiment {
        concept_id: SEMI_SUPERVISED_ID,
        title: "FixMatch on CIFAR-10".to_string(),
        description: Some(
            "Evaluation of FixMatch algorithm on CIFAR-10 with varying amounts of labeled data."
                .to_string(),
        ),
        setup: Some(FIXMATCH_SETUP.to_string()),
        results: Some(json!({
            "accuracy": 94.93,
            "error_rate": 5.07,
            "comparison": {
                "supervised_only": 83.32,
                "pseudo_label": 85.22,
                "mean_teacher": 89.64,
                "uda": 91.18,
                "fixmatch": 94.93
            }
        })),
        metrics: Some(json!({
            "epochs": [1, 5, 10, 15, 20, 25, 30, 35, 40, 45, 50],
            "train_loss": [2.3, 1.8, 1.4, 1.1, 0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.35],
            "val_loss": [2.2, 1.7, 1.3, 1.0, 0.85, 0.75, 0.65, 0.6, 0.55, 0.5, 0.45],
            "train_accuracy": [45, 56, 67, 75, 80, 84, 87, 90, 92, 93, 94],
            "val_accuracy": [44, 55, 65, 73, 78, 82, 85, 88, 91, 93, 94]
        })),
    }]
}

fn papers() -> Vec<NewPaper> {
    vec![
        NewPaper {
            title: "FixMatch: Simplifying Semi-Supervised Learning with Consistency and Confidence"
                .to_string(),
            authors: "Kihyuk Sohn, David Berthelot, Chun-Liang Li, Zizhao Zhang, Nicholas \
                      Carlini, Ekin D. Cubuk, Alex Kurakin, Han Zhang, Colin Raffel"
                .to_string(),
            year: 2020,
            conference: Some("NeurIPS".to_string()),
            link: Some("https://arxiv.org/abs/2001.07685".to_string()),
            r#abstract: Some(
                "Semi-supervised learning (SSL) provides an effective means to leverage \
                 unlabeled data to improve a model's performance. In this paper, we demonstrate \
                 the power of a simple combination of two common SSL methods: consistency \
                 regularization and pseudo-labeling. Our algorithm, FixMatch, first generates \
                 pseudo-labels using the model's predictions on weakly-augmented unlabeled \
                 images. For a given image, the pseudo-label is only retained if the model \
                 produces a high-confidence prediction. The model is then trained to predict \
                 this pseudo-label when fed a strongly-augmented version of the same image. \
                 Despite its simplicity, we show that FixMatch achieves state-of-the-art \
                 performance across a variety of standard semi-supervised learning benchmarks, \
                 including 94.93% accuracy on CIFAR-10 with 250 labels and 88.61% accuracy \
                 with 40 -- just 4 labels per class. We carry out an extensive ablation study \
                 to tease apart the various aspects of FixMatch that lead to its success."
                    .to_string(),
            ),
            key_points: Some(
                "\n- Combines pseudo-labeling with consistency regularization\n\
                 - Uses weak augmentation for generating pseudo-labels\n\
                 - Uses strong augmentation for consistency regularization\n\
                 - Only retains high-confidence predictions as pseudo-labels\n\
                 - Simple yet effective approach that outperforms previous methods\n\
                 - Works well even with very few labeled examples\n"
                    .to_string(),
            ),
            concepts: Some(tags(&[
                SEMI_SUPERVISED_SLUG,
                "consistency-regularization",
                "pseudo-labeling",
            ])),
        },
        NewPaper {
            title: "Bootstrap Your Own Latent: A New Approach to Self-Supervised Learning"
                .to_string(),
            authors: "Jean-Bastien Grill, Florian Strub, Florent Altché, Corentin Tallec, \
                      Pierre H. Richemond, Elena Buchatskaya, Carl Doersch, Bernardo Avila \
                      Pires, Zhaohan Daniel Guo, Mohammad Gheshlaghi Azar, Bilal Piot, Koray \
                      Kavukcuoglu, Rémi Munos, Michal Valko"
                .to_string(),
            year: 2020,
            conference: Some("NeurIPS".to_string()),
            link: Some("https://arxiv.org/abs/2006.07733".to_string()),
            r#abstract: Some(
                "We introduce Bootstrap Your Own Latent (BYOL), a new approach to \
                 self-supervised image representation learning. BYOL relies on two neural \
                 networks, referred to as online and target networks, that interact and learn \
                 from each other. From an augmented view of an image, we train the online \
                 network to predict the target network representation of the same image under \
                 a different augmented view. At the same time, we update the target network \
                 with a slow-moving average of the online network. While previous methods \
                 based on contrastive learning explicitly push representations of distinct \
                 images apart, BYOL achieves similar performance without using negative pairs. \
                 We demonstrate that BYOL achieves state-of-the-art results on ImageNet and in \
                 robustness tests."
                    .to_string(),
            ),
            key_points: Some(
                "\n- Self-supervised learning method that doesn't rely on negative pairs\n\
                 - Uses two networks: online and target networks\n\
                 - Online network predicts target network's representation of the same image\n\
                 - Target network is updated with an exponential moving average of the online \
                 network\n\
                 - Achieves state-of-the-art performance without relying on contrastive \
                 learning\n"
                    .to_string(),
            ),
            concepts: Some(tags(&[SELF_SUPERVISED_SLUG, "representation-learning"])),
        },
        NewPaper {
            title: "A Simple Framework for Contrastive Learning of Visual Representations"
                .to_string(),
            authors: "Ting Chen, Simon Kornblith, Mohammad Norouzi, Geoffrey Hinton".to_string(),
            year: 2020,
            conference: Some("ICML".to_string()),
            link: Some("https://arxiv.org/abs/2002.05709".to_string()),
            r#abstract: Some(
                "This paper presents SimCLR: a simple framework for contrastive learning of \
                 visual representations. We simplify recently proposed contrastive \
                 self-supervised learning algorithms without requiring specialized \
                 architectures or a memory bank. In order to understand what enables the \
                 contrastive prediction tasks to learn useful representations, we \
                 systematically study the major components of our framework. We show that (1) \
                 composition of data augmentations plays a critical role in defining effective \
                 predictive tasks, (2) introducing a learnable nonlinear transformation between \
                 the representation and the contrastive loss substantially improves the \
                 quality of the learned representations, and (3) contrastive learning benefits \
                 from larger batch sizes and more training steps compared to supervised \
                 learning. By combining these findings, we are able to considerably outperform \
                 previous methods for self-supervised and semi-supervised learning on \
                 ImageNet. A linear classifier trained on self-supervised representations \
                 learned by SimCLR achieves 76.5% top-1 accuracy, which is a 7% absolute \
                 improvement over previous state-of-the-art, matching the performance of a \
                 supervised ResNet-50."
                    .to_string(),
            ),
            key_points: Some(
                "\n- A simple contrastive learning framework without specialized architectures \
                 or memory banks\n\
                 - Highlights the importance of data augmentation in contrastive learning\n\
                 - Introduces a projection head between representation and contrastive loss\n\
                 - Benefits from larger batch sizes for more negative examples\n\
                 - Outperforms previous self-supervised methods by a significant margin\n"
                    .to_string(),
            ),
            concepts: Some(tags(&[SELF_SUPERVISED_SLUG, CONTRASTIVE_SLUG])),
        },
    ]
}

fn tags(slugs: &[&str]) -> Vec<String> {
    slugs.iter().map(|s| (*s).to_string()).collect()
}

// =============================================================================
// TESTS
// =============================================================================
