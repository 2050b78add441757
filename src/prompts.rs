// Coaching template bank. `{topic}` is the topic name, `{question}` the
// user's message stripped of question marks.

use crate::classifier::{char_len, contains_any, Category};

pub const TOPIC_PLACEHOLDER: &str = "{topic}";
pub const QUESTION_PLACEHOLDER: &str = "{question}";

// ============ Greeting ============

pub const GREETING_TEMPLATES: &[&str] = &[
    r#"你好！我是你的费曼学习法助手。我们今天要探索"{topic}"这个主题。

费曼学习法的核心理念是：如果你不能用简单的语言向他人解释一个概念，那么你可能并没有真正理解它。请尝试用你自己的话，用简单的语言解释"{topic}"，就像你在向一个10岁的孩子解释一样。"#,
    r#"嗨！很高兴见到你！我是专门帮助你应用费曼学习法的AI助手。今天我们将一起探索"{topic}"。

你知道吗？理查德·费曼曾说过："如果你不能向一个六年级学生解释它，那么你自己也没有真正理解它。"让我们开始吧！请尝试用最简单的语言解释"{topic}"的基本概念。"#,
    r#"欢迎来到费曼学习法练习！我是你的学习伙伴，将帮助你深入理解"{topic}"这个主题。

费曼技术的第一步是尝试用你自己的话解释概念。不需要使用专业术语或复杂的词汇，就像你在向一个完全不了解这个主题的朋友解释一样。你能试试吗？"#,
];

// ============ Method Inquiry ============

pub const METHOD_TEMPLATES: &[&str] = &[
    r#"费曼学习法是由诺贝尔物理学奖获得者理查德·费曼开发的一种强大的学习技术。它包括四个关键步骤：

1. 选择一个概念 - 确定你想要学习的主题
2. 用简单的语言教授它 - 假装你在向一个小学生解释这个概念
3. 识别知识缺口 - 注意到你在解释过程中遇到的困难或不清楚的部分
4. 回顾和简化 - 回到学习资料，填补知识缺口，然后再次尝试简化你的解释

这种方法之所以有效，是因为它迫使你真正理解概念的核心，而不是仅仅记忆术语或公式。当你能够用简单的语言解释复杂的概念时，你就真正掌握了它。

现在，你能尝试用费曼技术来解释"{topic}"这个概念吗？"#,
    r#"费曼学习法是一种"通过教学来学习"的方法，由著名物理学家理查德·费曼创立。它的核心思想非常简单却极其有效：

想象你正在向一个完全不了解该主题的人（比如一个小学生）解释一个复杂的概念。这迫使你：
• 使用简单、日常的语言而非专业术语
• 创造生动的类比和比喻
• 关注核心原理而非细节
• 识别出你自己理解中的漏洞

当你发现自己无法简单解释某个部分时，这正是你需要回去学习和深入理解的地方。

让我们一起应用这个方法来学习"{topic}"。你能用最简单的语言解释这个概念的基本原理吗？"#,
    r#"费曼学习法可以用一句话概括：如果你不能用简单的语言解释它，你就不真正理解它。

这个方法有四个简单步骤：
1️⃣ 选择你想学习的主题
2️⃣ 假装向一个不懂这个主题的人解释它（使用简单的语言）
3️⃣ 当你卡住时，回到学习材料
4️⃣ 简化并使用类比，直到你能够清晰解释

这个方法特别有效，因为它帮助你识别出"幻觉理解"——你以为你理解了，但实际上只是记住了一些术语或公式。

现在，让我们把这个方法应用到"{topic}"上。请尝试用你自己的话，用最简单的语言来解释它。"#,
];

// ============ Long Explanation Feedback ============

pub const FEEDBACK_SIMPLIFY_LANGUAGE: &str = r#"我看到你对"{topic}"有很多见解！你的解释包含了很多信息，这很好。不过，费曼技术的核心是极度简化。

试着想象你正在向一个10岁的孩子解释这个概念。你会如何调整你的语言？哪些术语需要用更简单的词汇替换？哪些部分可能需要一个生动的类比来帮助理解？

记住，简化不是降低概念的准确性，而是找到表达其核心本质的最简单方式。"#;

pub const FEEDBACK_ADD_ANALOGY: &str = r#"你的解释很有条理！为了让"{topic}"更容易理解，我们可以尝试添加一些生动的类比或比喻。

好的类比能够将抽象概念与日常经验联系起来。例如，如果你在解释电流，你可以比喻为水流；如果在解释计算机内存，可以比喻为图书馆的书架系统。

你能想到一个与日常生活相关的类比，来帮助解释"{topic}"的核心概念吗？这样的类比会让你的解释更加生动和易于理解。"#;

pub const FEEDBACK_IDENTIFY_GAPS: &str = r#"谢谢你的解释！这是应用费曼技术的重要一步。现在，让我们进入下一个阶段：识别知识缺口。

在你刚才的解释中，有没有任何部分是你感到不太确定的？或者有没有任何概念是你觉得难以用简单语言表达的？

识别这些"卡壳"的地方非常重要，因为它们通常指向我们理解中的盲点。一旦我们找到这些盲点，我们就可以有针对性地深入学习，然后再次尝试解释。"#;

pub const FEEDBACK_ADD_STRUCTURE: &str = r#"你对"{topic}"的解释包含了很多好的观点！为了让你的解释更加清晰，我们可以尝试将其组织成更结构化的形式。

你能尝试将"{topic}"分解为2-3个核心组成部分或原则吗？然后我们可以一个一个地探讨它们。

这种分解复杂概念的方法是费曼技术的重要部分，它帮助我们确保我们理解了概念的各个方面，而不仅仅是表面。"#;

pub const FEEDBACK_CONDENSE: &str = r#"你的解释展示了对"{topic}"的深入思考！现在，让我们尝试费曼技术中最具挑战性的部分：极度简化。

你能否将"{topic}"的核心概念浓缩为不超过3-4个简单句子？想象你只有30秒时间向一个完全不了解这个主题的人解释它。

这种极度简化的练习能帮助你找到概念的本质，并确保你真正理解了它的核心。"#;

/// Connectives that suggest the explanation leans on jargon.
pub const JARGON_CONNECTIVES: &[&str] = &[
    "因此", "然而", "此外", "综上所述", "换言之", "本质上", "基本上", "理论上",
    "therefore", "however", "moreover", "in essence", "basically", "theoretically",
];

pub const ANALOGY_PHRASES: &[&str] = &[
    "就像", "类似于", "好比", "如同", "相当于", "可以比作",
    "just like", "similar to", "is like", "analogous to",
];

pub const STRUCTURE_MARKERS: &[&str] = &["1.", "首先", "其次", "first"];

/// Explanations longer than this always get the "simplify" nudge.
pub const VERBOSE_EXPLANATION_CHARS: usize = 300;

/// Secondary features of an explanation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedbackSignals {
    pub heavy_jargon: bool,
    pub uses_analogies: bool,
    pub structured: bool,
}

impl FeedbackSignals {
    pub fn detect(message: &str) -> Self {
        Self {
            heavy_jargon: contains_any(message, JARGON_CONNECTIVES)
                || char_len(message) > VERBOSE_EXPLANATION_CHARS,
            uses_analogies: contains_any(message, ANALOGY_PHRASES),
            structured: message.contains('\n') && contains_any(message, STRUCTURE_MARKERS),
        }
    }
}

/// Feedback candidates for one explanation attempt, in bank order.
/// The "identify gaps" and "condense" prompts are always eligible.
pub fn feedback_pool(signals: FeedbackSignals) -> Vec<&'static str> {
    let mut pool = Vec::with_capacity(5);
    if signals.heavy_jargon {
        pool.push(FEEDBACK_SIMPLIFY_LANGUAGE);
    }
    if !signals.uses_analogies {
        pool.push(FEEDBACK_ADD_ANALOGY);
    }
    pool.push(FEEDBACK_IDENTIFY_GAPS);
    if !signals.structured {
        pool.push(FEEDBACK_ADD_STRUCTURE);
    }
    pool.push(FEEDBACK_CONDENSE);
    pool
}

// ============ Question ============

pub const QUESTION_TEMPLATES: &[&str] = &[
    r#"这是一个很好的问题！在费曼学习法的框架下，我们可以通过尝试自己回答这个问题来加深理解。

你对"{question}"有什么想法？尝试用最简单的语言回答这个问题，就像你在向一个小学生解释一样。这个过程会帮助你发现你的理解中可能存在的漏洞。"#,
    r#"问得好！这个问题触及了"{topic}"的重要方面。

费曼学习法鼓励我们通过教学来学习。所以，让我反问你：如果一个10岁的孩子问你同样的问题，你会如何回答？尝试用最简单的语言和具体的例子来解释。

这个练习不仅能帮助你巩固知识，还能揭示你理解中的任何不确定区域。"#,
    r#"这是个探索"{topic}"的绝佳问题！

在费曼学习法中，我们通过尝试解释概念来测试我们的理解。所以，我想邀请你先尝试回答这个问题。不需要担心答案是否完美 - 这个过程本身就是学习的一部分。

当你尝试解释时，注意哪些部分感觉不够清晰或确定 - 这些正是你可以进一步探索的领域。"#,
];

// ============ Continuation ============

pub const CONTINUATION_TEMPLATES: &[&str] = &[
    r#"让我们继续探索"{topic}"。费曼学习法的一个关键步骤是将复杂概念分解为更小、更容易理解的部分。

你认为"{topic}"可以分解为哪些基本组成部分或核心原则？尝试列出2-3个最基本的要素，然后我们可以逐一深入讨论。"#,
    r#"在学习"{topic}"的过程中，类比和比喻是非常强大的工具。它们可以帮助我们将抽象概念与熟悉的事物联系起来。

你能想到一个日常生活中的例子或类比，来帮助解释"{topic}"的核心概念吗？好的类比能让抽象概念变得更加具体和易于理解。"#,
    r#"费曼技术的一个重要部分是识别我们理解中的差距。在学习"{topic}"时，你发现哪些部分特别具有挑战性或难以用简单语言解释？

识别这些困难点是深化理解的第一步。一旦我们知道哪里有知识缺口，我们就可以有针对性地学习和改进。"#,
    r#"让我们尝试一个费曼学习法的核心练习。假设你需要向一个完全不了解"{topic}"的10岁孩子解释这个概念。

你会怎么开始？记住，避免使用任何专业术语或行业词汇，只使用孩子能理解的简单语言。这个练习会帮助你发现你真正理解的部分和需要进一步学习的部分。"#,
    r#"在应用费曼学习法时，一个有效的策略是"教学为了学习"。

想象你需要给一个班级的学生讲解"{topic}"的基础知识。你会如何组织这个15分钟的简短课程？哪些是你认为最重要、必须包含的核心概念？哪些例子或演示可以帮助学生理解？

这种"教学思维"能帮助你更清晰地组织知识，并发现可能需要进一步学习的领域。"#,
];

// ============ Perspective Flip ============

/// A response containing this already talks about the perspective flip.
pub const FLIP_MARKER: &str = "哥白尼";

pub const FLIP_PROMPTS: &[&str] = &[
    r#"顺便一提，我们也可以尝试应用"哥白尼翻转"来看待这个概念。如果我们完全颠倒我们对"{topic}"的常规理解，会发生什么？这种视角转换有时能带来意想不到的洞察。"#,
    r#"对了，你有没有尝试过从完全相反的角度思考"{topic}"？这种"哥白尼翻转"思维方式有时能帮助我们发现常规思维中的盲点。"#,
    r#"另外，考虑一下：如果"{topic}"的常规理解是错误的，真相可能是什么？这种哥白尼式的视角转换有时能带来创新的思考。"#,
];

// ============ Perspective Workspace ============

pub const PERSPECTIVE_QUESTIONS: &[&str] = &[
    "你会如何向从未听说过{topic}的人解释这个概念？",
    "你在原始视角中做出了哪些可能不正确的假设？",
    "一个完全不同领域的专家可能如何看待这个概念？",
    "如果你原始理解的反面是真的，会发生什么？",
    "这个概念如何与你熟悉的其他领域联系起来？",
];

// ============ Learning Summary ============

pub const SUMMARY_HEADING: &str = "--- 学习总结 ---";

pub const SUMMARY_GAP_SUGGESTIONS: &[&str] = &[
    "这个概念的历史背景和发展",
    "实际应用案例和例子",
    "与相关概念的联系",
];

pub const SUMMARY_NEXT_STEP: &str = "尝试从不同角度解释这个概念，或者寻找实际例子来加深理解。";

/// Fixed template list for a category. `LongExplanation` has no fixed list;
/// its pool comes from [`feedback_pool`].
pub fn fixed_templates(category: Category) -> &'static [&'static str] {
    match category {
        Category::Greeting => GREETING_TEMPLATES,
        Category::MethodInquiry => METHOD_TEMPLATES,
        Category::Question => QUESTION_TEMPLATES,
        Category::Continuation => CONTINUATION_TEMPLATES,
        Category::LongExplanation => &[],
    }
}

/// Candidate templates for one turn.
pub fn candidates(category: Category, message: &str) -> Vec<&'static str> {
    match category {
        Category::LongExplanation => feedback_pool(FeedbackSignals::detect(message)),
        other => fixed_templates(other).to_vec(),
    }
}
